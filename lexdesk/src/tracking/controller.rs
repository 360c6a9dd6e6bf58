use crm_client::{
    domain::{CaseId, NewTimeEntry},
    CrmApi,
};
use std::{collections::VecDeque, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use super::{format_elapsed, TrackingSession, ZERO_DISPLAY};
use crate::{
    entries::EntriesLoader,
    surface::{Controls, Surface, ToastKind},
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

const SAVED_MESSAGE: &str = "Время успешно сохранено";

/// What happened to the entry produced by a stop or a retry.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(NewTimeEntry),
    /// The save failed; the entry is queued for [`TrackingController::retry_save`].
    Unsaved(NewTimeEntry),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSnapshot {
    pub session: TrackingSession,
    pub elapsed: String,
    /// Entries whose save failed, oldest first.
    pub unsaved: Vec<NewTimeEntry>,
}

/// Owns the page's tracking session, its display tick and the save that
/// ends it.
#[derive(Clone)]
pub struct TrackingController {
    api: Arc<dyn CrmApi>,
    surface: Arc<dyn Surface>,
    entries: EntriesLoader,
    session: Arc<Mutex<TrackingSession>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    unsaved: Arc<Mutex<VecDeque<NewTimeEntry>>>,
    tick_interval: Duration,
}

impl TrackingController {
    pub fn new(
        api: Arc<dyn CrmApi>,
        surface: Arc<dyn Surface>,
        entries: EntriesLoader,
        tick_interval: Duration,
    ) -> Self {
        Self {
            api,
            surface,
            entries,
            session: Arc::new(Mutex::new(TrackingSession::Idle)),
            ticker: Arc::new(Mutex::new(None)),
            unsaved: Arc::new(Mutex::new(VecDeque::new())),
            tick_interval,
        }
    }

    /// Start tracking `case_id`. Returns `false`, changing nothing, when a
    /// session is already running.
    pub async fn start(&self, case_id: CaseId) -> bool {
        {
            let mut session = self.session.lock().await;
            if let TrackingSession::Running {
                case_id: running, ..
            } = *session
            {
                tracing::debug!(
                    "Ignoring start for case {}: case {} is already tracked",
                    case_id,
                    running
                );
                return false;
            }
            *session = TrackingSession::begin(case_id, Instant::now());
        }

        self.surface.set_controls(Controls::RUNNING);
        self.spawn_ticker().await;
        tracing::info!("Started tracking case {}", case_id);
        true
    }

    /// Stop the running session and save it with `description`.
    ///
    /// Returns `None` when nothing was running; no request is made then.
    pub async fn stop(&self, description: &str) -> Option<SaveOutcome> {
        let entry = {
            let mut session = self.session.lock().await;
            let TrackingSession::Running {
                case_id, started, ..
            } = *session
            else {
                tracing::debug!("Ignoring stop: nothing is being tracked");
                return None;
            };
            *session = TrackingSession::Idle;
            NewTimeEntry::from_elapsed(
                case_id,
                Instant::now().saturating_duration_since(started),
                description,
            )
        };
        self.cancel_ticker().await;

        tracing::info!(
            "Stopped tracking case {} after {}h",
            entry.case_id,
            entry.duration_field()
        );
        self.surface.set_controls(Controls::SAVING);
        Some(self.save(entry).await)
    }

    /// Send every entry whose save failed again, oldest first. Entries that
    /// fail again go back on the queue. Empty when nothing was waiting.
    pub async fn retry_save(&self) -> Vec<SaveOutcome> {
        let pending = self.unsaved.lock().await.len();
        if pending > 0 {
            tracing::info!("Retrying {} unsaved entries", pending);
        }

        // Entries failing again are pushed to the back, past `pending`.
        let mut outcomes = Vec::with_capacity(pending);
        for _ in 0..pending {
            let Some(entry) = self.unsaved.lock().await.pop_front() else {
                break;
            };
            outcomes.push(self.save(entry).await);
        }
        outcomes
    }

    pub async fn snapshot(&self) -> TrackingSnapshot {
        let session = *self.session.lock().await;
        TrackingSnapshot {
            session,
            elapsed: format_elapsed(session.elapsed(Instant::now()).as_secs()),
            unsaved: self.unsaved.lock().await.iter().cloned().collect(),
        }
    }

    async fn save(&self, entry: NewTimeEntry) -> SaveOutcome {
        let result = self.api.create_time_entry(&entry).await;
        let running = self.session.lock().await.is_running();

        match result {
            Ok(()) => {
                tracing::info!(
                    "Saved {}h for case {}",
                    entry.duration_field(),
                    entry.case_id
                );
                self.show_unsaved().await;
                self.surface.toast(SAVED_MESSAGE, ToastKind::Success);
                if !running {
                    self.surface.set_controls(Controls::IDLE);
                    self.surface.show_elapsed(ZERO_DISPLAY);
                }
                self.entries.refresh().await;
                SaveOutcome::Saved(entry)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to save {}h for case {}: {}",
                    entry.duration_field(),
                    entry.case_id,
                    e
                );
                self.unsaved.lock().await.push_back(entry.clone());
                self.show_unsaved().await;
                self.surface.toast(
                    &format!(
                        "Ошибка при сохранении времени: {} ч. не отправлены, повторите попытку",
                        entry.duration_field()
                    ),
                    ToastKind::Error,
                );
                if !running {
                    self.surface.set_controls(Controls::IDLE);
                }
                SaveOutcome::Unsaved(entry)
            }
        }
    }

    async fn show_unsaved(&self) {
        let unsaved: Vec<NewTimeEntry> = self.unsaved.lock().await.iter().cloned().collect();
        self.surface.show_unsaved(&unsaved);
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let session = self.session.clone();
        let surface = self.surface.clone();
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                let text = {
                    let guard = session.lock().await;
                    if !guard.is_running() {
                        break;
                    }
                    format_elapsed(guard.elapsed(Instant::now()).as_secs())
                };
                surface.show_elapsed(&text);
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}
