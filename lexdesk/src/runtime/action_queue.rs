use crm_client::domain::{CaseId, TaskId};
use time::Date;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One page event read from the terminal.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    StartTracking { case_id: CaseId },
    StopTracking { description: String },
    RetrySave,
    SearchInput { term: String },
    ApplyRange { start: Date, end: Date },
    ChangeStatus { task_id: TaskId, status: String },
    RefreshEntries,
    ShowSnapshot,
    Help,
    Quit,
}

impl Action {
    /// Tracking actions run in order on the event loop itself, so a `stop`
    /// is never overtaken by a later line or by shutdown.
    pub(super) fn is_tracking(&self) -> bool {
        matches!(
            self,
            Self::StartTracking { .. } | Self::StopTracking { .. } | Self::RetrySave
        )
    }
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
