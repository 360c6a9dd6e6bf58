use crm_client::domain::{CaseSummary, NewTimeEntry, TaskId, TimeEntry};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use crate::{
    status::Badge,
    surface::{Controls, Surface, ToastKind},
    tracking::TrackingSnapshot,
};

/// Renders the page as text, one line per update. The running time
/// rewrites its own line in place.
pub struct ConsoleSurface {
    out: Mutex<Box<dyn Write + Send>>,
    on_tick_line: AtomicBool,
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSurface {
    /// Console writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            on_tick_line: AtomicBool::new(false),
        }
    }

    fn out(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn print_lines(&self, text: &str) {
        let mut out = self.out();
        if self.on_tick_line.swap(false, Ordering::SeqCst) {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    pub fn print_snapshot(&self, snapshot: &TrackingSnapshot) {
        self.print_lines(&format_snapshot(snapshot));
    }
}

impl Surface for ConsoleSurface {
    fn toast(&self, message: &str, kind: ToastKind) {
        self.print_lines(&format_toast(message, kind));
    }

    fn show_elapsed(&self, text: &str) {
        let mut out = self.out();
        let _ = write!(out, "\r  ⏱ {}", text);
        let _ = out.flush();
        self.on_tick_line.store(true, Ordering::SeqCst);
    }

    fn set_controls(&self, controls: Controls) {
        tracing::debug!(
            "Controls: start={} stop={}",
            controls.start_enabled,
            controls.stop_enabled
        );
    }

    fn show_unsaved(&self, entries: &[NewTimeEntry]) {
        if !entries.is_empty() {
            self.print_lines(&format!(
                "{}\n  ('retry' чтобы отправить снова)",
                format_unsaved(entries)
            ));
        }
    }

    fn replace_entries(&self, entries: &[TimeEntry]) {
        self.print_lines(&format_entries(entries));
    }

    fn show_search_results(&self, term: &str, hits: &[CaseSummary]) {
        self.print_lines(&format_search_results(term, hits));
    }

    fn show_range_label(&self, label: &str) {
        self.print_lines(&format!("Период: {}", label));
    }

    fn update_revenue_chart(&self, months: &[String], revenue: &[f64]) {
        let rows = months
            .iter()
            .zip(revenue)
            .map(|(month, amount)| format!("  {:<12} {:>14.2}", month, amount))
            .collect::<Vec<_>>();
        self.print_lines(&format!("Выручка:\n{}", rows.join("\n")));
    }

    fn update_case_distribution_chart(&self, labels: &[String], values: &[u64]) {
        self.print_lines(&format!(
            "Распределение дел:\n{}",
            format_distribution(labels, values)
        ));
    }

    fn set_badge(&self, task_id: TaskId, badge: Badge) {
        self.print_lines(&format!(
            "Задача #{}: [{}] ({})",
            task_id,
            badge.label,
            badge.class_attr()
        ));
    }
}

fn format_toast(message: &str, kind: ToastKind) -> String {
    match kind {
        ToastKind::Success => format!("✓ {}", message),
        ToastKind::Error => format!("✗ {}", message),
    }
}

fn format_entries(entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return "Записей времени нет".to_string();
    }
    let rows = entries
        .iter()
        .map(|entry| {
            format!(
                "  {:>6.2} ч.  {}  ({})",
                entry.duration, entry.description, entry.lawyer_name
            )
        })
        .collect::<Vec<_>>();
    format!("Записи времени:\n{}", rows.join("\n"))
}

fn format_search_results(term: &str, hits: &[CaseSummary]) -> String {
    if term.is_empty() {
        return "Поиск сброшен".to_string();
    }
    if hits.is_empty() {
        return format!("По запросу '{}' ничего не найдено", term);
    }
    let rows = hits
        .iter()
        .map(|hit| match &hit.client_name {
            Some(client) => format!("  #{} {} {} ({})", hit.id, hit.case_number, hit.title, client),
            None => format!("  #{} {} {}", hit.id, hit.case_number, hit.title),
        })
        .collect::<Vec<_>>();
    format!("Найдено по '{}':\n{}", term, rows.join("\n"))
}

/// Unlabelled values get a positional label.
fn format_distribution(labels: &[String], values: &[u64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let label = labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("#{}", i + 1));
            format!("  {:<16} {}", label, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_snapshot(snapshot: &TrackingSnapshot) -> String {
    let mut text = match snapshot.session.case_id() {
        Some(case_id) => format!("Дело #{}: идет учет, {}", case_id, snapshot.elapsed),
        None => "Учет времени не ведется".to_string(),
    };
    if !snapshot.unsaved.is_empty() {
        text.push('\n');
        text.push_str(&format_unsaved(&snapshot.unsaved));
    }
    text
}

fn format_unsaved(entries: &[NewTimeEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "Не сохранено: дело #{}, {} ч.",
                entry.case_id,
                entry.duration_field()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cloneable in-memory writer for asserting on console output.
#[cfg(test)]
#[derive(Clone, Default)]
pub(super) struct SharedBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(super) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::TrackingSession;
    use crm_client::domain::CaseId;
    use std::time::Duration;

    #[test]
    fn toasts_are_marked_by_kind() {
        assert_eq!(format_toast("ok", ToastKind::Success), "✓ ok");
        assert_eq!(format_toast("nope", ToastKind::Error), "✗ nope");
    }

    #[test]
    fn empty_search_term_resets() {
        assert_eq!(format_search_results("", &[]), "Поиск сброшен");
        assert_eq!(
            format_search_results("зз", &[]),
            "По запросу 'зз' ничего не найдено"
        );
    }

    #[test]
    fn search_hits_list_client_when_known() {
        let hits = vec![CaseSummary {
            id: CaseId::new(5),
            title: "Взыскание долга".to_string(),
            case_number: "А40-123/2024".to_string(),
            client_name: Some("ООО Ромашка".to_string()),
        }];
        assert_eq!(
            format_search_results("долг", &hits),
            "Найдено по 'долг':\n  #5 А40-123/2024 Взыскание долга (ООО Ромашка)"
        );
    }

    #[test]
    fn distribution_without_labels_uses_positions() {
        assert_eq!(
            format_distribution(&["Гражданские".to_string()], &[3, 1]),
            "  Гражданские      3\n  #2               1"
        );
    }

    #[test]
    fn snapshot_mentions_unsaved_entry() {
        let snapshot = TrackingSnapshot {
            session: TrackingSession::Idle,
            elapsed: "00:00:00".to_string(),
            unsaved: vec![
                NewTimeEntry::from_elapsed(CaseId::new(3), Duration::from_secs(45 * 60), ""),
                NewTimeEntry::from_elapsed(CaseId::new(8), Duration::from_secs(2 * 3600), ""),
            ],
        };
        assert_eq!(
            format_snapshot(&snapshot),
            "Учет времени не ведется\nНе сохранено: дело #3, 0.75 ч.\nНе сохранено: дело #8, 2.00 ч."
        );
    }

    #[test]
    fn tick_line_is_closed_before_next_message() {
        let buffer = SharedBuffer::default();
        let console = ConsoleSurface::with_writer(buffer.clone());

        console.show_elapsed("00:00:01");
        console.show_elapsed("00:00:02");
        console.toast("Время успешно сохранено", ToastKind::Success);

        assert_eq!(
            buffer.contents(),
            "\r  ⏱ 00:00:01\r  ⏱ 00:00:02\n✓ Время успешно сохранено\n"
        );
    }
}
