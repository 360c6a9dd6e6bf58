use async_trait::async_trait;

use crate::{
    domain::{AnalyticsReport, CaseSummary, DateRange, NewTimeEntry, TaskId, TaskStatus, TimeEntry},
    CrmError,
};

/// The CRM operations the behavior layer depends on.
///
/// [`crate::CrmClient`] talks HTTP; [`crate::mock::MockCrm`] is scripted
/// for tests.
#[async_trait]
pub trait CrmApi: Send + Sync + 'static {
    /// Set a task's status. A `success: false` answer is
    /// [`CrmError::Rejected`].
    async fn update_task_status(&self, task_id: TaskId, status: TaskStatus)
        -> Result<(), CrmError>;

    /// Persist a tracked time entry. Any 2xx counts as success.
    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<(), CrmError>;

    /// List the time entries visible to the current user.
    async fn list_time_entries(&self) -> Result<Vec<TimeEntry>, CrmError>;

    /// Revenue and case distribution for a date range.
    async fn fetch_analytics(&self, range: DateRange) -> Result<AnalyticsReport, CrmError>;

    /// Free-text case search. An empty term lists the default result set.
    async fn search_cases(&self, term: &str) -> Result<Vec<CaseSummary>, CrmError>;
}
