use crm_client::domain::CaseId;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::Instant;

/// Display text for an idle or freshly saved session.
pub const ZERO_DISPLAY: &str = "00:00:00";

/// The one tracking session of a page.
///
/// `Running` carries the start time, so "running" and "has a start time"
/// cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingSession {
    #[default]
    Idle,
    Running {
        case_id: CaseId,
        /// Monotonic start, used for elapsed time.
        started: Instant,
        /// Wall-clock start, for logs and display.
        started_at: OffsetDateTime,
    },
}

impl TrackingSession {
    pub fn begin(case_id: CaseId, now: Instant) -> Self {
        Self::Running {
            case_id,
            started: now,
            started_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn case_id(&self) -> Option<CaseId> {
        match self {
            Self::Idle => None,
            Self::Running { case_id, .. } => Some(*case_id),
        }
    }

    pub fn start_time(&self) -> Option<Instant> {
        match self {
            Self::Idle => None,
            Self::Running { started, .. } => Some(*started),
        }
    }

    /// Time since start, or zero when idle.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.start_time()
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or_default()
    }
}

/// Format whole seconds as `HH:MM:SS`.
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_elapsed() {
        assert_eq!(format_elapsed(0), ZERO_DISPLAY);
        assert_eq!(format_elapsed(59), "00:00:59");
        assert_eq!(format_elapsed(3661), "01:01:01");
        assert_eq!(format_elapsed(36_000 + 45 * 60 + 7), "10:45:07");
        assert_eq!(format_elapsed(100 * 3600), "100:00:00");
    }

    #[test]
    fn idle_has_no_start() {
        let session = TrackingSession::default();
        assert!(!session.is_running());
        assert_eq!(session.start_time(), None);
        assert_eq!(session.case_id(), None);
        assert_eq!(session.elapsed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn running_has_start() {
        let now = Instant::now();
        let session = TrackingSession::begin(CaseId::new(3), now);
        assert!(session.is_running());
        assert_eq!(session.start_time(), Some(now));
        assert_eq!(session.case_id(), Some(CaseId::new(3)));
        assert_eq!(
            session.elapsed(now + Duration::from_millis(2500)),
            Duration::from_millis(2500)
        );
    }
}
