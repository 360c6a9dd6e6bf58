use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Task status values accepted by the status-update endpoint.
///
/// The server also knows `review`, but it is never set from the task list,
/// so it does not parse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Human-readable label, as the server renders it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "К выполнению",
            Self::InProgress => "В работе",
            Self::Done => "Выполнено",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_wire_values() {
        assert_eq!(TaskStatus::from_str("todo").unwrap(), TaskStatus::Todo);
        assert_eq!(
            TaskStatus::from_str("in_progress").unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!(TaskStatus::from_str("done").unwrap(), TaskStatus::Done);
        assert!(TaskStatus::from_str("review").is_err());
        assert!(TaskStatus::from_str("Done").is_err());
    }

    #[test]
    fn displays_wire_value() {
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(TaskStatus::Done.as_ref(), "done");
    }

    #[test]
    fn labels() {
        assert_eq!(TaskStatus::Todo.label(), "К выполнению");
        assert_eq!(TaskStatus::InProgress.label(), "В работе");
        assert_eq!(TaskStatus::Done.label(), "Выполнено");
    }
}
