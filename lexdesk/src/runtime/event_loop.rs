use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    task::JoinSet,
};

use super::{
    action_queue::{channel, Action, ActionRx, ActionTx},
    actions::run_action,
    commands::{parse_line, CommandError},
    console::ConsoleSurface,
};
use crate::page::Page;

/// Read page events from stdin until `quit` or end of input.
pub async fn run_page(page: Page, console: Arc<ConsoleSurface>) -> Result<()> {
    run_page_from(page, console, BufReader::new(tokio::io::stdin())).await
}

/// Run the page on lines from `input`.
///
/// Tracking actions are awaited in order on this loop. Everything else runs
/// on its own task so searches and status changes don't wait on a save.
/// Those tasks are drained before returning.
pub async fn run_page_from<R>(page: Page, console: Arc<ConsoleSurface>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (action_tx, mut action_rx): (ActionTx, ActionRx) = channel();

    page.load().await;
    console.print_lines("Введите 'help' для списка команд");

    let reader_console = console.clone();
    let reader = tokio::spawn(async move {
        if let Err(e) = read_lines(input, &action_tx, reader_console).await {
            tracing::error!("{:#}", e);
        }
        let _ = action_tx.send(Action::Quit);
    });

    let mut tasks = JoinSet::new();
    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,
            action if action.is_tracking() => {
                run_action(action, page.clone(), console.clone()).await;
            }
            action => {
                tasks.spawn(run_action(action, page.clone(), console.clone()));
            }
        }
        while let Some(result) = tasks.try_join_next() {
            log_task_failure(result);
        }
    }

    reader.abort();
    while let Some(result) = tasks.join_next().await {
        log_task_failure(result);
    }

    let snapshot = page.tracking.snapshot().await;
    if let Some(case_id) = snapshot.session.case_id() {
        tracing::warn!(
            "Discarding unsaved session for case {} ({})",
            case_id,
            snapshot.elapsed
        );
    }
    for entry in snapshot.unsaved {
        tracing::warn!(
            "Discarding unsent entry of {}h for case {}",
            entry.duration_field(),
            entry.case_id
        );
    }
    Ok(())
}

fn log_task_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!("Page action failed: {}", e);
    }
}

async fn read_lines<R>(input: R, action_tx: &ActionTx, console: Arc<ConsoleSurface>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match parse_line(&line) {
            Ok(action) => {
                if action_tx.send(action).is_err() {
                    return Ok(());
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => console.print_lines(&format!("{}. Введите 'help'", e)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Settings, runtime::console::SharedBuffer, surface::Surface};
    use crm_client::{
        domain::{CaseId, NewTimeEntry},
        mock::{CrmCall, MockCrm},
        CrmApi, CrmError,
    };

    struct Harness {
        crm: MockCrm,
        page: Page,
        console: Arc<ConsoleSurface>,
        output: SharedBuffer,
    }

    fn harness(crm: MockCrm) -> Harness {
        let output = SharedBuffer::default();
        let console = Arc::new(ConsoleSurface::with_writer(output.clone()));
        let api: Arc<dyn CrmApi> = Arc::new(crm.clone());
        let surface: Arc<dyn Surface> = console.clone();
        let page = Page::new(api, surface, &Settings::default());
        Harness {
            crm,
            page,
            console,
            output,
        }
    }

    async fn run(harness: &Harness, input: &'static str) {
        run_page_from(
            harness.page.clone(),
            harness.console.clone(),
            BufReader::new(input.as_bytes()),
        )
        .await
        .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_end_of_input_is_saved() {
        let harness = harness(MockCrm::new());

        run(&harness, "start 1\nstop Консультация\n").await;

        assert_eq!(
            harness.crm.created_entries(),
            vec![NewTimeEntry {
                case_id: CaseId::new(1),
                duration_hours: 0.0,
                description: "Консультация".to_string(),
            }]
        );
        assert!(harness.output.contents().contains("✓ Время успешно сохранено"));
        assert!(!harness.page.tracking.snapshot().await.session.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_before_end_of_input_is_reported() {
        let harness = harness(MockCrm::new().with_create_failures(vec![CrmError::Unauthorized]));

        run(&harness, "start 1\nstop\n").await;

        assert_eq!(harness.crm.created_entries().len(), 1);
        assert!(harness.output.contents().contains("Не сохранено: дело #1"));
        assert_eq!(harness.page.tracking.snapshot().await.unsaved.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_ignores_later_lines() {
        let harness = harness(MockCrm::new());

        run(&harness, "quit\nstart 1\nstop\n").await;

        assert_eq!(harness.crm.calls(), vec![CrmCall::ListTimeEntries]);
        assert!(!harness.page.tracking.snapshot().await.session.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn running_session_is_not_saved_on_exit() {
        let harness = harness(MockCrm::new());

        run(&harness, "start 5\n").await;

        assert!(harness.crm.created_entries().is_empty());
        assert_eq!(
            harness.page.tracking.snapshot().await.session.case_id(),
            Some(CaseId::new(5))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn status_change_finishes_before_return() {
        let harness = harness(MockCrm::new());

        run(&harness, "status 4 done\n").await;

        assert!(harness.output.contents().contains("Задача #4: [Выполнено]"));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_prints_hint_without_request() {
        let harness = harness(MockCrm::new());

        run(&harness, "status 4 review\n").await;

        assert_eq!(harness.crm.calls(), vec![CrmCall::ListTimeEntries]);
        assert!(harness
            .output
            .contents()
            .contains("Неизвестный статус 'review' (todo, in_progress, done)"));
    }

    #[tokio::test(start_paused = true)]
    async fn bad_lines_print_usage_hint() {
        let harness = harness(MockCrm::new());

        run(&harness, "dance\n\nstart x\n").await;

        let output = harness.output.contents();
        assert!(output.contains("unknown command 'dance'. Введите 'help'"));
        assert!(output.contains("'x' is not a valid id"));
        assert_eq!(harness.crm.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_without_unsaved_entries_says_so() {
        let harness = harness(MockCrm::new());

        run(&harness, "retry\nstop\n").await;

        let output = harness.output.contents();
        assert!(output.contains("Нет несохраненных записей"));
        assert!(output.contains("Учет времени не ведется"));
        assert_eq!(harness.crm.call_count(), 1);
    }
}
