use crate::document::models::{Item, PreconditionReport, Task, UnsatisfiedPrecondition};
use crate::identity::{item_at, locate, IdentityMap};
use crate::status::{display_status, is_terminal_success};
use std::collections::HashSet;

const REASON_NOT_FOUND: &str = "Task not found";
const REASON_NOT_COMPLETED: &str = "Not completed";

/// Check whether every precondition of `item` is in terminal-success state.
///
/// All preconditions are evaluated; nothing short-circuits. A key that does
/// not resolve, or resolves to a number with no matching item, is reported as
/// `Task not found`. This is advisory: callers decide what to do with it.
pub fn check_preconditions(item: &Item, tasks: &[Task], map: &IdentityMap) -> PreconditionReport {
    let mut unsatisfied = Vec::new();

    for key in item.preconditions() {
        let Some(number) = map.resolve(key) else {
            unsatisfied.push(UnsatisfiedPrecondition {
                key: key.clone(),
                number: None,
                current_status: None,
                reason: REASON_NOT_FOUND.to_string(),
            });
            continue;
        };

        let Some(found) = locate(number, tasks, map) else {
            unsatisfied.push(UnsatisfiedPrecondition {
                key: key.clone(),
                number: None,
                current_status: None,
                reason: REASON_NOT_FOUND.to_string(),
            });
            continue;
        };

        let dependency = item_at(tasks, found.location);
        if !is_terminal_success(dependency.status.as_deref()) {
            unsatisfied.push(UnsatisfiedPrecondition {
                key: key.clone(),
                number: Some(number.to_string()),
                current_status: Some(display_status(dependency.status.as_deref())),
                reason: REASON_NOT_COMPLETED.to_string(),
            });
        }
    }

    PreconditionReport {
        satisfied: unsatisfied.is_empty(),
        unsatisfied,
    }
}

/// Numbers of every task and subtask in terminal-success state.
pub fn completed_numbers(tasks: &[Task]) -> HashSet<String> {
    tasks
        .iter()
        .flat_map(|t| std::iter::once(&t.item).chain(t.subtasks()))
        .filter(|item| is_terminal_success(item.status.as_deref()))
        .filter_map(Item::number_string)
        .collect()
}

/// True when every resolved dependency number is completed.
pub fn dependencies_satisfied(resolved: &[String], completed: &HashSet<String>) -> bool {
    resolved.iter().all(|number| completed.contains(number))
}
