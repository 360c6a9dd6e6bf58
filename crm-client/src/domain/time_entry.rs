use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::time::Duration;

use super::CaseId;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A time entry as listed by `GET /api/time-entries/`.
///
/// Durations are stored as decimals server-side and may arrive as either a
/// number or a string.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub description: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub duration: f64,
    pub lawyer_name: String,
}

/// Payload for `POST /api/time-entries/create/`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimeEntry {
    pub case_id: CaseId,
    /// Hours, rounded to two decimals.
    pub duration_hours: f64,
    pub description: String,
}

impl NewTimeEntry {
    pub fn from_elapsed(case_id: CaseId, elapsed: Duration, description: impl Into<String>) -> Self {
        Self {
            case_id,
            duration_hours: hours_rounded(elapsed),
            description: description.into(),
        }
    }

    /// The `duration` form field, always with two decimals.
    pub fn duration_field(&self) -> String {
        format!("{:.2}", self.duration_hours)
    }
}

/// Converts an elapsed span to hours rounded to two decimal places.
pub fn hours_rounded(elapsed: Duration) -> f64 {
    let hours = elapsed.as_millis() as f64 / MILLIS_PER_HOUR;
    (hours * 100.0).round() / 100.0
}
