use std::sync::Arc;

use super::{action_queue::Action, commands::USAGE, console::ConsoleSurface};
use crate::{page::Page, status::StatusUpdateError};

pub(super) async fn run_action(action: Action, page: Page, console: Arc<ConsoleSurface>) {
    match action {
        Action::StartTracking { case_id } => {
            if !page.tracking.start(case_id).await {
                console.print_lines("Учет времени уже идет, сначала остановите его ('stop')");
            }
        }
        Action::StopTracking { description } => {
            if page.tracking.stop(&description).await.is_none() {
                console.print_lines("Учет времени не ведется");
            }
        }
        Action::RetrySave => {
            if page.tracking.retry_save().await.is_empty() {
                console.print_lines("Нет несохраненных записей");
            }
        }
        Action::SearchInput { term } => {
            page.search.on_input(&term).await;
        }
        Action::ApplyRange { start, end } => {
            // Rejection is already reported on the surface.
            let _ = page.analytics.on_range_applied(start, end).await;
        }
        Action::ChangeStatus { task_id, status } => {
            if let Err(e) = page.status.on_status_change(task_id, &status).await {
                tracing::debug!("Status change for task {} not applied: {}", task_id, e);
                if let StatusUpdateError::UnknownStatus(raw) = e {
                    console.print_lines(&format!(
                        "Неизвестный статус '{}' (todo, in_progress, done)",
                        raw
                    ));
                }
            }
        }
        Action::RefreshEntries => {
            page.entries.refresh().await;
        }
        Action::ShowSnapshot => {
            console.print_snapshot(&page.tracking.snapshot().await);
        }
        Action::Help => {
            console.print_lines(USAGE);
        }
        Action::Quit => {}
    }
}
