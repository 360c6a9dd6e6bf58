use crm_client::{
    domain::{DateRange, InvalidDateRange},
    CrmApi,
};
use std::sync::Arc;
use time::Date;

use super::QuerySequence;
use crate::surface::{Surface, ToastKind};

const ANALYTICS_FAILED: &str = "Ошибка при загрузке аналитики";
const RANGE_INVALID: &str = "Дата окончания раньше даты начала";

/// Loads the revenue and case-distribution charts for a confirmed range.
#[derive(Clone)]
pub struct AnalyticsDispatcher {
    api: Arc<dyn CrmApi>,
    surface: Arc<dyn Surface>,
    sequence: Arc<QuerySequence>,
}

impl AnalyticsDispatcher {
    pub fn new(api: Arc<dyn CrmApi>, surface: Arc<dyn Surface>) -> Self {
        Self {
            api,
            surface,
            sequence: Arc::new(QuerySequence::new()),
        }
    }

    /// Called when the date picker closes with both dates chosen.
    pub async fn on_range_applied(&self, start: Date, end: Date) -> Result<(), InvalidDateRange> {
        let range = DateRange::new(start, end).map_err(|e| {
            tracing::warn!("Rejecting analytics range {} - {}: {}", start, end, e);
            self.surface.toast(RANGE_INVALID, ToastKind::Error);
            e
        })?;

        self.surface.show_range_label(&range.label());
        self.load(range).await;
        Ok(())
    }

    async fn load(&self, range: DateRange) {
        let ticket = self.sequence.issue();
        tracing::debug!("Fetching analytics for {}", range.label());

        match self.api.fetch_analytics(range).await {
            Ok(report) if self.sequence.is_current(ticket) => {
                tracing::info!(
                    "Analytics for {}: {} months",
                    range.label(),
                    report.months.len()
                );
                self.surface
                    .update_revenue_chart(&report.months, &report.revenue);
                self.surface.update_case_distribution_chart(
                    &report.case_distribution.labels,
                    &report.case_distribution.values,
                );
            }
            Ok(_) => {
                tracing::debug!("Dropping stale analytics for {}", range.label());
            }
            Err(e) => {
                tracing::warn!("Analytics for {} failed: {}", range.label(), e);
                self.surface.toast(ANALYTICS_FAILED, ToastKind::Error);
            }
        }
    }
}
