use crate::priority::PriorityLevel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// Numeric identifier of a task or subtask.
///
/// Subtasks conventionally carry `parent.index` (for example `1.2`) as a plain
/// JSON number. The parsed JSON number is kept as-is so the document round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemNumber(Number);

impl ItemNumber {
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    /// Integer value, accepting whole floats such as `3.0`.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64().or_else(|| {
            self.0
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
    }
}

impl fmt::Display for ItemNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemNumber {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<Number>(s).map(ItemNumber)
    }
}

impl From<i64> for ItemNumber {
    fn from(n: i64) -> Self {
        ItemNumber(Number::from(n))
    }
}

/// Fields shared by tasks and subtasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Items without a number are kept and reset, but cannot be addressed,
    /// scheduled or used as a precondition target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<ItemNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<Vec<String>>,
    /// Fields this crate does not interpret, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(number: ItemNumber) -> Self {
        Self {
            number: Some(number),
            key: None,
            title: None,
            status: None,
            result: None,
            priority: None,
            precondition: None,
            extra: Map::new(),
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_priority(mut self, priority: &str) -> Self {
        self.priority = Some(priority.to_string());
        self
    }

    pub fn with_result(mut self, result: &str) -> Self {
        self.result = Some(result.to_string());
        self
    }

    pub fn with_precondition(mut self, keys: &[&str]) -> Self {
        self.precondition = Some(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    /// The number as callers address it (`"3"`, `"3.1"`).
    pub fn number_string(&self) -> Option<String> {
        self.number.as_ref().map(ToString::to_string)
    }

    /// Key, treating an empty string as absent.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn preconditions(&self) -> &[String] {
        self.precondition.as_deref().unwrap_or_default()
    }
}

/// Top-level task. Subtasks are one level deep only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Item>>,
}

impl Task {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            subtasks: None,
        }
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Item>) -> Self {
        self.subtasks = Some(subtasks);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.item = self.item.with_status(status);
        self
    }

    pub fn with_priority(mut self, priority: &str) -> Self {
        self.item = self.item.with_priority(priority);
        self
    }

    pub fn with_precondition(mut self, keys: &[&str]) -> Self {
        self.item = self.item.with_precondition(keys);
        self
    }

    pub fn subtasks(&self) -> &[Item] {
        self.subtasks.as_deref().unwrap_or_default()
    }

    pub fn subtasks_mut(&mut self) -> &mut [Item] {
        self.subtasks.as_deref_mut().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(
        rename = "tasksResultOutputDir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tasks_result_output_dir: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole task document as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskDocument {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            meta: None,
            tasks,
            extra: Map::new(),
        }
    }

    pub fn subtask_count(&self) -> usize {
        self.tasks.iter().map(|t| t.subtasks().len()).sum()
    }

    pub fn result_output_dir(&self) -> crate::error::Result<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.tasks_result_output_dir.as_deref())
            .filter(|dir| !dir.is_empty())
            .ok_or(crate::error::TaskError::OutputDirNotConfigured)
    }
}

/// The item chosen by the next-item selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextItem {
    /// `"1"` for a task, `"1.2"` for a subtask.
    pub number: String,
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: String,
    pub priority: PriorityLevel,
    /// Preconditions resolved to numeric identifiers.
    pub precondition: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_number: Option<String>,
}

impl NextItem {
    pub fn is_subtask(&self) -> bool {
        self.number.contains('.')
    }
}

/// One precondition that is not in terminal-success state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsatisfiedPrecondition {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
    pub reason: String,
}

impl fmt::Display for UnsatisfiedPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(number) = &self.number {
            write!(f, " ({})", number)?;
        }
        write!(f, ": {}", self.reason)?;
        if let Some(status) = &self.current_status {
            write!(f, " (current: {})", status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconditionReport {
    pub satisfied: bool,
    pub unsatisfied: Vec<UnsatisfiedPrecondition>,
}

/// A subtask whose status was changed by a cascade from its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadedChange {
    pub number: Option<String>,
    pub key: Option<String>,
    pub previous_status: String,
    pub status: String,
}

/// Before/after record for one addressed identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub identifier: String,
    pub number: String,
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: String,
    pub previous_status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cascaded: Vec<CascadedChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Subtask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRecord {
    pub key: Option<String>,
    pub number: Option<String>,
    pub previous_status: String,
    pub previous_result: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub reset_tasks: Vec<ResetRecord>,
    pub reset_subtasks: Vec<ResetRecord>,
    pub total_tasks: usize,
    pub total_subtasks: usize,
    pub total_items: usize,
}
