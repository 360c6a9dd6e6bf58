use crm_client::CrmApi;
use std::sync::Arc;

use crate::surface::{Surface, ToastKind};

const ENTRIES_FAILED: &str = "Не удалось загрузить список записей времени";

/// Reloads the time-entry list. Every refresh replaces the whole list.
#[derive(Clone)]
pub struct EntriesLoader {
    api: Arc<dyn CrmApi>,
    surface: Arc<dyn Surface>,
}

impl EntriesLoader {
    pub fn new(api: Arc<dyn CrmApi>, surface: Arc<dyn Surface>) -> Self {
        Self { api, surface }
    }

    /// Returns `false` when the list could not be loaded; the previous list
    /// is left in place.
    pub async fn refresh(&self) -> bool {
        match self.api.list_time_entries().await {
            Ok(entries) => {
                tracing::debug!("Loaded {} time entries", entries.len());
                self.surface.replace_entries(&entries);
                true
            }
            Err(e) => {
                tracing::warn!("Could not load time entries: {}", e);
                self.surface.toast(ENTRIES_FAILED, ToastKind::Error);
                false
            }
        }
    }
}
