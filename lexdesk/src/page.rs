use crm_client::CrmApi;
use std::sync::Arc;

use crate::{
    config::Settings,
    dispatch::{AnalyticsDispatcher, SearchDispatcher},
    entries::EntriesLoader,
    status::StatusUpdateHandler,
    surface::{Controls, Surface},
    tracking::{TrackingController, ZERO_DISPLAY},
};

/// Everything one open page needs. Controllers share the same API client
/// and surface.
#[derive(Clone)]
pub struct Page {
    pub tracking: TrackingController,
    pub search: SearchDispatcher,
    pub analytics: AnalyticsDispatcher,
    pub status: StatusUpdateHandler,
    pub entries: EntriesLoader,
    surface: Arc<dyn Surface>,
}

impl Page {
    pub fn new(api: Arc<dyn CrmApi>, surface: Arc<dyn Surface>, settings: &Settings) -> Self {
        let entries = EntriesLoader::new(api.clone(), surface.clone());
        Self {
            tracking: TrackingController::new(
                api.clone(),
                surface.clone(),
                entries.clone(),
                settings.tracking.tick_interval(),
            ),
            search: SearchDispatcher::new(
                api.clone(),
                surface.clone(),
                settings.search.quiet_period(),
            ),
            analytics: AnalyticsDispatcher::new(api.clone(), surface.clone()),
            status: StatusUpdateHandler::new(api, surface.clone()),
            entries,
            surface,
        }
    }

    /// Initial render: idle controls, a zero display and the entry list.
    pub async fn load(&self) {
        self.surface.set_controls(Controls::IDLE);
        self.surface.show_elapsed(ZERO_DISPLAY);
        self.entries.refresh().await;
    }
}
