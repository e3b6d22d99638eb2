//! Key → number resolution
//!
//! The identity map is derived from the tree on every operation and never
//! persisted. Numbers are carried as strings (`"2"`, `"2.1"`) because that is
//! how callers address items.

use crate::document::models::{Item, ItemNumber, Task};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    by_key: HashMap<String, String>,
}

impl IdentityMap {
    /// Record `key -> number` for every task and subtask that has both.
    ///
    /// Duplicate keys are not rejected: the last occurrence in document order
    /// wins.
    pub fn build(tasks: &[Task]) -> Self {
        let mut by_key = HashMap::new();
        for task in tasks {
            let items = std::iter::once(&task.item).chain(task.subtasks());
            for item in items {
                let (Some(key), Some(number)) = (item.key(), item.number_string()) else {
                    continue;
                };
                if let Some(previous) = by_key.insert(key.to_string(), number) {
                    tracing::debug!(key, previous = %previous, "Duplicate task key, last one wins");
                }
            }
        }
        Self { by_key }
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// Resolve a precondition list, dropping keys that match nothing.
    pub fn resolve_all(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter_map(|key| self.resolve(key))
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Position of an item inside the two-level tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    Task(usize),
    Subtask { task: usize, subtask: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedItem {
    pub location: ItemLocation,
    /// The number the identifier resolved to, e.g. `"3"` or `"3.1"`.
    pub full_number: String,
}

/// Find an item by key or by number.
///
/// A key is tried first. Otherwise the identifier itself is treated as a
/// number: a dotted value addresses a subtask under the task whose number is
/// the integer part, anything else a top-level task.
pub fn locate(identifier: &str, tasks: &[Task], map: &IdentityMap) -> Option<LocatedItem> {
    let target = map.resolve(identifier).unwrap_or(identifier);
    let parent_number = leading_integer(target)?;
    let task_idx = tasks
        .iter()
        .position(|t| t.item.number.as_ref().and_then(ItemNumber::as_i64) == Some(parent_number))?;

    let location = if target.contains('.') {
        let subtask_idx = tasks[task_idx]
            .subtasks()
            .iter()
            .position(|st| st.number_string().as_deref() == Some(target))?;
        ItemLocation::Subtask {
            task: task_idx,
            subtask: subtask_idx,
        }
    } else {
        ItemLocation::Task(task_idx)
    };

    Some(LocatedItem {
        location,
        full_number: target.to_string(),
    })
}

fn leading_integer(target: &str) -> Option<i64> {
    target.split('.').next()?.trim().parse().ok()
}

pub fn item_at(tasks: &[Task], location: ItemLocation) -> &Item {
    match location {
        ItemLocation::Task(t) => &tasks[t].item,
        ItemLocation::Subtask { task, subtask } => &tasks[task].subtasks()[subtask],
    }
}

pub fn item_at_mut(tasks: &mut [Task], location: ItemLocation) -> &mut Item {
    match location {
        ItemLocation::Task(t) => &mut tasks[t].item,
        ItemLocation::Subtask { task, subtask } => &mut tasks[task].subtasks_mut()[subtask],
    }
}
