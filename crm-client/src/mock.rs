//! Scripted CRM implementation for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::{
    AnalyticsReport, CaseId, CaseSummary, DateRange, NewTimeEntry, TaskId, TaskStatus, TimeEntry,
};
use crate::{CrmApi, CrmError};

/// A call received by [`MockCrm`].
#[derive(Debug, Clone, PartialEq)]
pub enum CrmCall {
    UpdateTaskStatus(TaskId, TaskStatus),
    CreateTimeEntry(NewTimeEntry),
    ListTimeEntries,
    FetchAnalytics(DateRange),
    SearchCases(String),
}

#[derive(Default)]
struct Script {
    status_failure: Option<CrmError>,
    create_failures: VecDeque<CrmError>,
    entries: Vec<TimeEntry>,
    entries_failure: Option<CrmError>,
    analytics: AnalyticsReport,
    analytics_failure: Option<CrmError>,
    analytics_delays: HashMap<DateRange, Duration>,
    search_failure: Option<CrmError>,
    search_delays: HashMap<String, Duration>,
}

/// In-memory CRM that records every call and answers from a script.
///
/// # Examples
///
/// ```
/// use crm_client::mock::MockCrm;
/// use crm_client::CrmError;
///
/// // First save fails, the retry goes through
/// let crm = MockCrm::new().with_create_failures(vec![CrmError::transport("offline")]);
/// ```
#[derive(Clone, Default)]
pub struct MockCrm {
    script: Arc<RwLock<Script>>,
    calls: Arc<RwLock<Vec<CrmCall>>>,
}

impl MockCrm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every status update with `error`.
    pub fn with_status_failure(self, error: CrmError) -> Self {
        self.script.write().unwrap().status_failure = Some(error);
        self
    }

    /// Fail the next saves, one error per call, then succeed.
    pub fn with_create_failures(self, errors: Vec<CrmError>) -> Self {
        self.script.write().unwrap().create_failures = errors.into();
        self
    }

    pub fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        self.script.write().unwrap().entries = entries;
        self
    }

    pub fn with_entries_failure(self, error: CrmError) -> Self {
        self.script.write().unwrap().entries_failure = Some(error);
        self
    }

    pub fn with_analytics(self, report: AnalyticsReport) -> Self {
        self.script.write().unwrap().analytics = report;
        self
    }

    pub fn with_analytics_failure(self, error: CrmError) -> Self {
        self.script.write().unwrap().analytics_failure = Some(error);
        self
    }

    /// Delay the answer for `range` by `delay`.
    pub fn with_analytics_delay(self, range: DateRange, delay: Duration) -> Self {
        self.script
            .write()
            .unwrap()
            .analytics_delays
            .insert(range, delay);
        self
    }

    pub fn with_search_failure(self, error: CrmError) -> Self {
        self.script.write().unwrap().search_failure = Some(error);
        self
    }

    /// Delay the answer for `term` by `delay`.
    pub fn with_search_delay(self, term: &str, delay: Duration) -> Self {
        self.script
            .write()
            .unwrap()
            .search_delays
            .insert(term.to_string(), delay);
        self
    }

    /// All calls received so far, oldest first.
    pub fn calls(&self) -> Vec<CrmCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Terms passed to `search_cases`, oldest first.
    pub fn search_terms(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CrmCall::SearchCases(term) => Some(term),
                _ => None,
            })
            .collect()
    }

    /// Entries passed to `create_time_entry`, oldest first.
    pub fn created_entries(&self) -> Vec<NewTimeEntry> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CrmCall::CreateTimeEntry(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: CrmCall) {
        self.calls.write().unwrap().push(call);
    }

    /// The hit returned for `term`: a single case titled after it, or none
    /// for the empty term.
    pub fn hits_for(term: &str) -> Vec<CaseSummary> {
        if term.is_empty() {
            return vec![];
        }
        vec![CaseSummary {
            id: CaseId::new(term.chars().count() as i64),
            title: term.to_string(),
            case_number: format!("A-{}", term.chars().count()),
            client_name: None,
        }]
    }
}

#[async_trait]
impl CrmApi for MockCrm {
    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<(), CrmError> {
        self.record(CrmCall::UpdateTaskStatus(task_id, status));
        match self.script.read().unwrap().status_failure.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<(), CrmError> {
        self.record(CrmCall::CreateTimeEntry(entry.clone()));
        match self.script.write().unwrap().create_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_time_entries(&self) -> Result<Vec<TimeEntry>, CrmError> {
        self.record(CrmCall::ListTimeEntries);
        let script = self.script.read().unwrap();
        match &script.entries_failure {
            Some(error) => Err(error.clone()),
            None => Ok(script.entries.clone()),
        }
    }

    async fn fetch_analytics(&self, range: DateRange) -> Result<AnalyticsReport, CrmError> {
        self.record(CrmCall::FetchAnalytics(range));
        let delay = self.script.read().unwrap().analytics_delays.get(&range).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let script = self.script.read().unwrap();
        match &script.analytics_failure {
            Some(error) => Err(error.clone()),
            None => Ok(script.analytics.clone()),
        }
    }

    async fn search_cases(&self, term: &str) -> Result<Vec<CaseSummary>, CrmError> {
        self.record(CrmCall::SearchCases(term.to_string()));
        let (delay, failure) = {
            let script = self.script.read().unwrap();
            (
                script.search_delays.get(term).copied(),
                script.search_failure.clone(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(Self::hits_for(term)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let crm = MockCrm::new();

        crm.update_task_status(TaskId::new(3), TaskStatus::Done)
            .await
            .unwrap();
        crm.list_time_entries().await.unwrap();
        crm.search_cases("иск").await.unwrap();

        assert_eq!(
            crm.calls(),
            vec![
                CrmCall::UpdateTaskStatus(TaskId::new(3), TaskStatus::Done),
                CrmCall::ListTimeEntries,
                CrmCall::SearchCases("иск".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn create_failures_are_consumed_one_per_call() {
        let crm = MockCrm::new().with_create_failures(vec![CrmError::transport("offline")]);
        let entry = NewTimeEntry::from_elapsed(CaseId::new(1), Duration::from_secs(60), "x");

        assert!(crm.create_time_entry(&entry).await.is_err());
        assert!(crm.create_time_entry(&entry).await.is_ok());
        assert_eq!(crm.created_entries().len(), 2);
    }

    #[tokio::test]
    async fn empty_term_has_no_hits() {
        let crm = MockCrm::new();
        assert!(crm.search_cases("").await.unwrap().is_empty());
        assert_eq!(crm.search_cases("ab").await.unwrap()[0].title, "ab");
    }
}
