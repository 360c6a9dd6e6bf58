use crm_client::{
    domain::{TaskId, TaskStatus},
    CrmApi, CrmError,
};
use std::{str::FromStr, sync::Arc};
use thiserror::Error;

use crate::surface::{Surface, ToastKind};

const STATUS_UPDATED: &str = "Статус задачи обновлен";
const STATUS_FAILED: &str = "Ошибка при обновлении статуса";

/// Display state of a task's status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub class: &'static str,
    pub label: &'static str,
}

impl Badge {
    pub fn for_status(status: TaskStatus) -> Self {
        let class = match status {
            TaskStatus::Todo => "badge-new",
            TaskStatus::InProgress => "badge-in-progress",
            TaskStatus::Done => "badge-completed",
        };
        Self {
            class,
            label: status.label(),
        }
    }

    /// Full `class` attribute, base class included.
    pub fn class_attr(&self) -> String {
        format!("badge {}", self.class)
    }
}

#[derive(Debug, Error)]
pub enum StatusUpdateError {
    #[error("unknown task status '{0}'")]
    UnknownStatus(String),
    #[error(transparent)]
    Crm(#[from] CrmError),
}

/// Sends task status changes and mirrors confirmed ones into the badge.
#[derive(Clone)]
pub struct StatusUpdateHandler {
    api: Arc<dyn CrmApi>,
    surface: Arc<dyn Surface>,
}

impl StatusUpdateHandler {
    pub fn new(api: Arc<dyn CrmApi>, surface: Arc<dyn Surface>) -> Self {
        Self { api, surface }
    }

    /// Handle a status select change. The badge is only touched after the
    /// server confirms.
    pub async fn on_status_change(
        &self,
        task_id: TaskId,
        raw_status: &str,
    ) -> Result<TaskStatus, StatusUpdateError> {
        let status = TaskStatus::from_str(raw_status).map_err(|_| {
            tracing::warn!("Refusing unknown status '{}' for task {}", raw_status, task_id);
            StatusUpdateError::UnknownStatus(raw_status.to_string())
        })?;

        match self.api.update_task_status(task_id, status).await {
            Ok(()) => {
                tracing::info!("Task {} is now {}", task_id, status);
                self.surface.toast(STATUS_UPDATED, ToastKind::Success);
                self.surface.set_badge(task_id, Badge::for_status(status));
                Ok(status)
            }
            Err(e) => {
                tracing::warn!("Failed to set task {} to {}: {}", task_id, status, e);
                self.surface.toast(STATUS_FAILED, ToastKind::Error);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;
    use crm_client::mock::{CrmCall, MockCrm};

    fn handler(crm: &MockCrm, surface: &RecordingSurface) -> StatusUpdateHandler {
        StatusUpdateHandler::new(Arc::new(crm.clone()), Arc::new(surface.clone()))
    }

    #[test]
    fn badge_mapping() {
        let todo = Badge::for_status(TaskStatus::Todo);
        assert_eq!((todo.class, todo.label), ("badge-new", "К выполнению"));

        let in_progress = Badge::for_status(TaskStatus::InProgress);
        assert_eq!(
            (in_progress.class, in_progress.label),
            ("badge-in-progress", "В работе")
        );

        let done = Badge::for_status(TaskStatus::Done);
        assert_eq!((done.class, done.label), ("badge-completed", "Выполнено"));
        assert_eq!(done.class_attr(), "badge badge-completed");
    }

    #[tokio::test]
    async fn done_updates_badge_after_success() {
        let crm = MockCrm::new();
        let surface = RecordingSurface::new();

        let status = handler(&crm, &surface)
            .on_status_change(TaskId::new(5), "done")
            .await
            .unwrap();

        assert_eq!(status, TaskStatus::Done);
        assert_eq!(
            crm.calls(),
            vec![CrmCall::UpdateTaskStatus(TaskId::new(5), TaskStatus::Done)]
        );
        let badges = surface.badges();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].0, TaskId::new(5));
        assert_eq!(badges[0].1.class, "badge-completed");
        assert_eq!(badges[0].1.label, "Выполнено");
        assert_eq!(
            surface.toasts(),
            vec![(STATUS_UPDATED.to_string(), ToastKind::Success)]
        );
    }

    #[tokio::test]
    async fn transport_failure_leaves_badge_untouched() {
        let crm = MockCrm::new().with_status_failure(CrmError::transport("connection reset"));
        let surface = RecordingSurface::new();

        let result = handler(&crm, &surface)
            .on_status_change(TaskId::new(5), "done")
            .await;

        assert!(matches!(result, Err(StatusUpdateError::Crm(_))));
        assert!(surface.badges().is_empty());
        assert_eq!(
            surface.toasts(),
            vec![(STATUS_FAILED.to_string(), ToastKind::Error)]
        );
    }

    #[tokio::test]
    async fn rejected_update_leaves_badge_untouched() {
        let crm = MockCrm::new().with_status_failure(CrmError::Rejected(
            "POST /api/tasks/5/update-status/".to_string(),
        ));
        let surface = RecordingSurface::new();

        let result = handler(&crm, &surface)
            .on_status_change(TaskId::new(5), "in_progress")
            .await;

        assert!(result.is_err());
        assert!(surface.badges().is_empty());
        assert_eq!(surface.error_toasts(), 1);
    }

    #[tokio::test]
    async fn unknown_status_sends_nothing() {
        let crm = MockCrm::new();
        let surface = RecordingSurface::new();

        let result = handler(&crm, &surface)
            .on_status_change(TaskId::new(5), "review")
            .await;

        assert!(matches!(result, Err(StatusUpdateError::UnknownStatus(s)) if s == "review"));
        assert_eq!(crm.call_count(), 0);
        assert!(surface.events().is_empty());
    }
}
