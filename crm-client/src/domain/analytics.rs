use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use thiserror::Error;
use time::{macros::format_description, Date};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("date range ends before it starts")]
pub struct InvalidDateRange;

/// An inclusive range confirmed in the analytics date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, InvalidDateRange> {
        if end < start {
            return Err(InvalidDateRange);
        }
        Ok(Self { start, end })
    }

    /// `start_date` / `end_date` query parameters, formatted `YYYY-MM-DD`.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", iso_date(self.start)),
            ("end_date", iso_date(self.end)),
        ]
    }

    /// Text shown in the picker input, e.g. `01.03.2024 - 31.03.2024`.
    pub fn label(&self) -> String {
        format!("{} - {}", dotted_date(self.start), dotted_date(self.end))
    }
}

// Both descriptions only use date components, so formatting a `Date` cannot fail.
fn iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn dotted_date(date: Date) -> String {
    date.format(format_description!("[day].[month].[year]"))
        .unwrap_or_default()
}

/// Body of `GET /api/analytics/`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    #[serde(default)]
    pub months: Vec<String>,
    #[serde_as(as = "Vec<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub revenue: Vec<f64>,
    #[serde(default)]
    pub case_distribution: CaseDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseDistribution {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<u64>,
}
