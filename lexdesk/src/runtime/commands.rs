use crm_client::domain::{CaseId, TaskId};
use thiserror::Error;
use time::{macros::format_description, Date};

use super::action_queue::Action;

pub(super) const USAGE: &str = "\
Commands:
  start <case_id>                         start tracking time on a case
  stop [description...]                   stop tracking and save the entry
  retry                                   send the entry whose save failed again
  search [term...]                        type into the case search box
  analytics <YYYY-MM-DD> <YYYY-MM-DD>     apply an analytics date range
  status <task_id> <todo|in_progress|done> change a task's status
  entries                                 reload time entries
  show                                    print the tracking state
  help                                    print this help
  quit                                    exit";

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum CommandError {
    #[error("empty line")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{0}' is not a valid id")]
    InvalidId(String),
    #[error("'{0}' is not a date (YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Parse one terminal line into an [`Action`].
///
/// Everything after `search ` is kept verbatim as the input value, inner
/// spaces included.
pub(super) fn parse_line(line: &str) -> Result<Action, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    let (command, rest) = match trimmed.split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (trimmed, ""),
    };

    match command {
        "" => Err(CommandError::Empty),
        "start" => {
            let raw = single_argument(rest, "start", "a case id")?;
            let case_id = raw
                .parse::<CaseId>()
                .map_err(|_| CommandError::InvalidId(raw.to_string()))?;
            Ok(Action::StartTracking { case_id })
        }
        "stop" => Ok(Action::StopTracking {
            description: rest.trim().to_string(),
        }),
        "retry" => Ok(Action::RetrySave),
        "search" => Ok(Action::SearchInput {
            term: rest.to_string(),
        }),
        "analytics" => {
            let mut dates = rest.split_whitespace();
            let (Some(start), Some(end)) = (dates.next(), dates.next()) else {
                return Err(CommandError::MissingArgument {
                    command: "analytics",
                    expected: "a start and an end date",
                });
            };
            Ok(Action::ApplyRange {
                start: parse_date(start)?,
                end: parse_date(end)?,
            })
        }
        "status" => {
            let mut args = rest.split_whitespace();
            let (Some(task_id), Some(status)) = (args.next(), args.next()) else {
                return Err(CommandError::MissingArgument {
                    command: "status",
                    expected: "a task id and a status",
                });
            };
            let task_id = task_id
                .parse::<TaskId>()
                .map_err(|_| CommandError::InvalidId(task_id.to_string()))?;
            Ok(Action::ChangeStatus {
                task_id,
                status: status.to_string(),
            })
        }
        "entries" => Ok(Action::RefreshEntries),
        "show" => Ok(Action::ShowSnapshot),
        "help" | "?" => Ok(Action::Help),
        "quit" | "exit" => Ok(Action::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn single_argument<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    rest.split_whitespace()
        .next()
        .ok_or(CommandError::MissingArgument { command, expected })
}

fn parse_date(raw: &str) -> Result<Date, CommandError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| CommandError::InvalidDate(raw.to_string()))
}
