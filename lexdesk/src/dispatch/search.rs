use crm_client::CrmApi;
use std::{sync::Arc, time::Duration};

use super::{Debouncer, QuerySequence};
use crate::surface::{Surface, ToastKind};

pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(500);

const SEARCH_FAILED: &str = "Ошибка при поиске";

/// Whether `term` may be sent. The empty term is sent to reset the results.
pub fn is_searchable(term: &str) -> bool {
    let len = term.chars().count();
    len == 0 || len >= 2
}

/// Turns search keystrokes into at most one case search per quiet period.
#[derive(Clone)]
pub struct SearchDispatcher {
    api: Arc<dyn CrmApi>,
    surface: Arc<dyn Surface>,
    debouncer: Arc<Debouncer>,
    sequence: Arc<QuerySequence>,
}

impl SearchDispatcher {
    pub fn new(api: Arc<dyn CrmApi>, surface: Arc<dyn Surface>, quiet_period: Duration) -> Self {
        Self {
            api,
            surface,
            debouncer: Arc::new(Debouncer::new(quiet_period)),
            sequence: Arc::new(QuerySequence::new()),
        }
    }

    /// Feed the full input value after a keystroke.
    pub async fn on_input(&self, term: &str) {
        let this = self.clone();
        let term = term.to_string();
        self.debouncer
            .schedule(async move { this.dispatch(term).await })
            .await;
    }

    async fn dispatch(&self, term: String) {
        if !is_searchable(&term) {
            tracing::debug!("Search term '{}' is too short, not sending", term);
            return;
        }

        let ticket = self.sequence.issue();
        tracing::debug!("Searching cases for '{}'", term);

        match self.api.search_cases(&term).await {
            Ok(hits) if self.sequence.is_current(ticket) => {
                tracing::debug!("{} cases match '{}'", hits.len(), term);
                self.surface.show_search_results(&term, &hits);
            }
            Ok(_) => {
                tracing::debug!("Dropping stale search results for '{}'", term);
            }
            Err(e) => {
                tracing::warn!("Case search for '{}' failed: {}", term, e);
                self.surface.toast(SEARCH_FAILED, ToastKind::Error);
            }
        }
    }
}
