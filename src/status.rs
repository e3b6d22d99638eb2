//! Status normalization
//!
//! Stored status strings are kept exactly as they were written. Every
//! comparison goes through [`normalize`] / [`TaskStatus::classify`] instead of
//! comparing raw strings inline.

use crate::error::{Result, TaskError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status assumed for items that carry no status at all.
pub const DEFAULT_STATUS: &str = "pending";

/// Values accepted by the status transition engine.
pub const STATUS_OPTIONS: &[&str] = &[
    "pending",
    "done",
    "in-progress",
    "review",
    "deferred",
    "cancelled",
];

/// Accepted on input as a spelling of `done`.
const COMPLETED_SYNONYM: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    Done,
    InProgress,
    Review,
    Deferred,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Deferred => "deferred",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Classify a stored status, case-insensitively, with `completed` folded
    /// into `Done`. Unknown values yield `None`.
    pub fn classify(raw: Option<&str>) -> Option<Self> {
        match normalize(raw).as_str() {
            "pending" => Some(TaskStatus::Pending),
            "done" | COMPLETED_SYNONYM => Some(TaskStatus::Done),
            "in-progress" => Some(TaskStatus::InProgress),
            "review" => Some(TaskStatus::Review),
            "deferred" => Some(TaskStatus::Deferred),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }

    /// Validate a requested status. Matching is exact: the six canonical
    /// values plus `completed`.
    pub fn parse_requested(value: &str) -> Result<Self> {
        let accepted = value == COMPLETED_SYNONYM || STATUS_OPTIONS.contains(&value);
        accepted
            .then(|| Self::classify(Some(value)))
            .flatten()
            .ok_or_else(|| TaskError::InvalidStatus {
                value: value.to_string(),
                options: STATUS_OPTIONS.join(", "),
            })
    }

    pub fn is_terminal_success(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Statuses the scheduler considers workable.
    pub fn is_actionable(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Missing or empty status defaults to `pending`; the result is lower-cased.
pub fn normalize(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => DEFAULT_STATUS.to_string(),
    }
}

/// True iff the status is `done` or `completed`, ignoring case.
pub fn is_terminal_success(raw: Option<&str>) -> bool {
    TaskStatus::classify(raw).is_some_and(|s| s.is_terminal_success())
}

/// The stored status, or the default when absent.
pub fn display_status(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => DEFAULT_STATUS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults_and_lowercases() {
        assert_eq!(normalize(None), "pending");
        assert_eq!(normalize(Some("")), "pending");
        assert_eq!(normalize(Some("In-Progress")), "in-progress");
        assert_eq!(normalize(Some("DONE")), "done");
    }

    #[test]
    fn test_terminal_success_is_done_or_completed_any_case() {
        for s in ["done", "Done", "DONE", "completed", "Completed", "cOmPlEtEd"] {
            assert!(is_terminal_success(Some(s)), "{} should be terminal", s);
        }
        for s in ["pending", "in-progress", "review", "deferred", "cancelled", "finished"] {
            assert!(!is_terminal_success(Some(s)), "{} should not be terminal", s);
        }
        assert!(!is_terminal_success(None));
    }

    #[test]
    fn test_classify_unknown_is_none() {
        assert_eq!(TaskStatus::classify(Some("blocked")), None);
        assert_eq!(
            TaskStatus::classify(Some("In-Progress")),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(TaskStatus::classify(None), Some(TaskStatus::Pending));
    }

    #[test]
    fn test_parse_requested_exact_match() {
        assert_eq!(
            TaskStatus::parse_requested("in-progress").unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!(
            TaskStatus::parse_requested("completed").unwrap(),
            TaskStatus::Done
        );
        assert!(TaskStatus::parse_requested("Done").is_err());
        assert!(TaskStatus::parse_requested("blocked").is_err());
        assert!(TaskStatus::parse_requested("").is_err());
    }

    #[test]
    fn test_invalid_status_message_lists_options() {
        let err = TaskStatus::parse_requested("started").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status value: started. Use one of: pending, done, in-progress, review, deferred, cancelled"
        );
    }

    #[test]
    fn test_actionable_statuses() {
        assert!(TaskStatus::Pending.is_actionable());
        assert!(TaskStatus::InProgress.is_actionable());
        assert!(!TaskStatus::Review.is_actionable());
        assert!(!TaskStatus::Done.is_actionable());
    }
}
