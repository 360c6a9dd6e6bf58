use crm_client::domain::{CaseSummary, NewTimeEntry, TaskId, TimeEntry};
use std::sync::{Arc, RwLock};

use super::{Controls, Surface, ToastKind};
use crate::status::Badge;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceEvent {
    Toast(String, ToastKind),
    Elapsed(String),
    Controls(Controls),
    Unsaved(Vec<NewTimeEntry>),
    Entries(Vec<TimeEntry>),
    SearchResults(String, Vec<CaseSummary>),
    RangeLabel(String),
    RevenueChart(Vec<String>, Vec<f64>),
    CaseDistributionChart(Vec<String>, Vec<u64>),
    Badge(TaskId, Badge),
}

/// Surface that keeps everything it is told, for assertions.
#[derive(Clone, Default)]
pub(crate) struct RecordingSurface {
    events: Arc<RwLock<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<SurfaceEvent> {
        self.events.read().unwrap().clone()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.write().unwrap().push(event);
    }

    pub(crate) fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Toast(message, kind) => Some((message, kind)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn error_toasts(&self) -> usize {
        self.toasts()
            .iter()
            .filter(|(_, kind)| *kind == ToastKind::Error)
            .count()
    }

    pub(crate) fn elapsed_texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Elapsed(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_elapsed(&self) -> Option<String> {
        self.elapsed_texts().pop()
    }

    pub(crate) fn last_controls(&self) -> Option<Controls> {
        self.events().into_iter().rev().find_map(|event| match event {
            SurfaceEvent::Controls(controls) => Some(controls),
            _ => None,
        })
    }

    pub(crate) fn last_unsaved(&self) -> Option<Vec<NewTimeEntry>> {
        self.events().into_iter().rev().find_map(|event| match event {
            SurfaceEvent::Unsaved(entry) => Some(entry),
            _ => None,
        })
    }

    pub(crate) fn entry_lists(&self) -> Vec<Vec<TimeEntry>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Entries(entries) => Some(entries),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn search_results(&self) -> Vec<(String, Vec<CaseSummary>)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::SearchResults(term, hits) => Some((term, hits)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn badges(&self) -> Vec<(TaskId, Badge)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Badge(task_id, badge) => Some((task_id, badge)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn toast(&self, message: &str, kind: ToastKind) {
        self.push(SurfaceEvent::Toast(message.to_string(), kind));
    }

    fn show_elapsed(&self, text: &str) {
        self.push(SurfaceEvent::Elapsed(text.to_string()));
    }

    fn set_controls(&self, controls: Controls) {
        self.push(SurfaceEvent::Controls(controls));
    }

    fn show_unsaved(&self, entries: &[NewTimeEntry]) {
        self.push(SurfaceEvent::Unsaved(entries.to_vec()));
    }

    fn replace_entries(&self, entries: &[TimeEntry]) {
        self.push(SurfaceEvent::Entries(entries.to_vec()));
    }

    fn show_search_results(&self, term: &str, hits: &[CaseSummary]) {
        self.push(SurfaceEvent::SearchResults(term.to_string(), hits.to_vec()));
    }

    fn show_range_label(&self, label: &str) {
        self.push(SurfaceEvent::RangeLabel(label.to_string()));
    }

    fn update_revenue_chart(&self, months: &[String], revenue: &[f64]) {
        self.push(SurfaceEvent::RevenueChart(months.to_vec(), revenue.to_vec()));
    }

    fn update_case_distribution_chart(&self, labels: &[String], values: &[u64]) {
        self.push(SurfaceEvent::CaseDistributionChart(
            labels.to_vec(),
            values.to_vec(),
        ));
    }

    fn set_badge(&self, task_id: TaskId, badge: Badge) {
        self.push(SurfaceEvent::Badge(task_id, badge));
    }
}
