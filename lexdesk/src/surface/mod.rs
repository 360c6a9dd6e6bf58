//! The rendering collaborator. Controllers push state out through
//! [`Surface`]; nothing is ever read back from it.

use crm_client::domain::{CaseSummary, NewTimeEntry, TaskId, TimeEntry};

use crate::status::Badge;

#[cfg(test)]
pub(crate) mod recording;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Enabled state of the start/stop tracking controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Controls {
    pub const IDLE: Self = Self {
        start_enabled: true,
        stop_enabled: false,
    };
    pub const RUNNING: Self = Self {
        start_enabled: false,
        stop_enabled: true,
    };
    /// While a stopped session is being saved.
    pub const SAVING: Self = Self {
        start_enabled: false,
        stop_enabled: false,
    };
}

pub trait Surface: Send + Sync + 'static {
    /// Transient notification that dismisses itself.
    fn toast(&self, message: &str, kind: ToastKind);

    /// Running tracking time, `HH:MM:SS`.
    fn show_elapsed(&self, text: &str);

    fn set_controls(&self, controls: Controls);

    /// Stopped sessions whose save failed and are waiting for a retry,
    /// oldest first. Empty once all of them are saved.
    fn show_unsaved(&self, entries: &[NewTimeEntry]);

    /// Replace the whole time-entry list.
    fn replace_entries(&self, entries: &[TimeEntry]);

    fn show_search_results(&self, term: &str, hits: &[CaseSummary]);

    /// Text of the analytics date-range input.
    fn show_range_label(&self, label: &str);

    fn update_revenue_chart(&self, months: &[String], revenue: &[f64]);

    fn update_case_distribution_chart(&self, labels: &[String], values: &[u64]);

    fn set_badge(&self, task_id: TaskId, badge: Badge);
}
