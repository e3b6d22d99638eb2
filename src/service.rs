//! Exposed operations
//!
//! Each operation is one full load → compute/mutate → save cycle against a
//! [`TaskStore`]. Failures never escape as `Err`: they become the
//! `{"status":"error","error":...}` envelope, and nothing is saved.

use crate::document::models::{NextItem, ResetSummary, StatusUpdate};
use crate::document::TaskStore;
use crate::error::Result;
use crate::guide;
use crate::tasks::TaskManager;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServiceResponse<T> {
    Success { data: T },
    Error { error: String },
}

impl<T> ServiceResponse<T> {
    fn failed(prefix: &str, err: impl Display) -> Self {
        let error = format!("{}: {}", prefix, err);
        tracing::error!(error = %error, "Operation failed");
        ServiceResponse::Error { error }
    }

    fn from_result(prefix: &str, result: Result<T>) -> Self {
        match result {
            Ok(data) => ServiceResponse::Success { data },
            Err(e) => Self::failed(prefix, e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResponse::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ServiceResponse::Success { data } => Some(data),
            ServiceResponse::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ServiceResponse::Success { .. } => None,
            ServiceResponse::Error { error } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTaskData {
    pub next_task: Option<NextItem>,
    pub is_subtask: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusData {
    pub message: String,
    pub updated_tasks: Vec<StatusUpdate>,
    pub total_updated: usize,
    pub config_saved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetData {
    pub message: String,
    #[serde(flatten)]
    pub summary: ResetSummary,
    pub config_saved: bool,
}

/// Find the next item to work on. Read-only.
pub fn next_task(store: &TaskStore) -> ServiceResponse<NextTaskData> {
    ServiceResponse::from_result("Error getting next task", next_task_inner(store))
}

fn next_task_inner(store: &TaskStore) -> Result<NextTaskData> {
    let mut doc = store.load()?;
    let next = TaskManager::new(&mut doc).pick_next();

    let data = match next {
        Some(item) => {
            let is_subtask = item.is_subtask();
            tracing::info!(number = %item.number, is_subtask, "Selected next task");
            NextTaskData {
                next_steps: Some(guide::next_steps(is_subtask)),
                next_task: Some(item),
                is_subtask,
                message: None,
            }
        },
        None => {
            tracing::info!("No eligible next task");
            NextTaskData {
                next_task: None,
                is_subtask: false,
                next_steps: None,
                message: Some(guide::NO_ELIGIBLE_TASK.to_string()),
            }
        },
    };

    Ok(data)
}

/// Split a comma-joined identifier list, trimming each entry.
pub fn split_identifiers(input: &str) -> Vec<String> {
    input.split(',').map(|id| id.trim().to_string()).collect()
}

/// Set `status` on one or more comma-separated identifiers and save.
pub fn set_task_status(
    store: &TaskStore,
    identifier: &str,
    status: &str,
) -> ServiceResponse<SetStatusData> {
    if identifier.trim().is_empty() {
        return ServiceResponse::Error {
            error: "No task identifier specified. Please provide a task key or number to update."
                .to_string(),
        };
    }
    if status.trim().is_empty() {
        return ServiceResponse::Error {
            error: "No status specified. Please provide a new status value.".to_string(),
        };
    }

    ServiceResponse::from_result(
        "Error setting task status",
        set_task_status_inner(store, identifier, status),
    )
}

fn set_task_status_inner(store: &TaskStore, identifier: &str, status: &str) -> Result<SetStatusData> {
    let mut doc = store.load()?;
    let identifiers = split_identifiers(identifier);
    let updated_tasks = TaskManager::new(&mut doc).set_status(&identifiers, status)?;

    store.save(&doc)?;
    tracing::info!(count = updated_tasks.len(), "Task configuration saved");

    let summary = updated_tasks
        .iter()
        .map(describe_update)
        .collect::<Vec<_>>()
        .join(", ");

    Ok(SetStatusData {
        message: format!(
            "Successfully updated {} task(s): {} to status \"{}\"",
            updated_tasks.len(),
            summary,
            status
        ),
        total_updated: updated_tasks.len(),
        updated_tasks,
        config_saved: true,
    })
}

fn describe_update(update: &StatusUpdate) -> String {
    let mut desc = match update.key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => format!("{} ({})", key, update.number),
        None => update.number.clone(),
    };
    if update.previous_status != update.status {
        desc.push_str(&format!(" [{} → {}]", update.previous_status, update.status));
    }
    desc
}

/// Reset the whole tree to `pending` with empty results and save.
pub fn initialize_tasks(store: &TaskStore) -> ServiceResponse<ResetData> {
    ServiceResponse::from_result("Error initializing tasks", initialize_tasks_inner(store))
}

fn initialize_tasks_inner(store: &TaskStore) -> Result<ResetData> {
    let mut doc = store.load()?;
    let summary = TaskManager::new(&mut doc).reset_all();

    store.save(&doc)?;
    tracing::info!(
        tasks = summary.total_tasks,
        subtasks = summary.total_subtasks,
        "Task configuration reset and saved"
    );

    Ok(ResetData {
        message: format!(
            "Reset {} task(s) and {} subtask(s) ({} items in total): every status is now \"pending\" and every result is empty",
            summary.total_tasks, summary.total_subtasks, summary.total_items
        ),
        summary,
        config_saved: true,
    })
}
