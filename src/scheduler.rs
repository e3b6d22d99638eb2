//! Next-item selection
//!
//! Two passes in strict precedence:
//!
//! 1. Subtasks of `in-progress` parents whose own status is `pending` or
//!    `in-progress` and whose resolved preconditions are all completed.
//! 2. Only if pass 1 finds nothing: top-level tasks under the same status and
//!    dependency rules.
//!
//! Candidates are ordered by priority (high first), then by fewer resolved
//! preconditions, then by ascending number. Precondition keys that resolve to
//! nothing are dropped rather than treated as blocking. Items without a
//! number are never candidates.

use crate::dependencies::{completed_numbers, dependencies_satisfied};
use crate::document::models::{Item, NextItem, Task};
use crate::identity::IdentityMap;
use crate::priority::PriorityLevel;
use crate::status::{display_status, TaskStatus};
use std::cmp::Ordering;
use std::collections::HashSet;

struct Candidate {
    next: NextItem,
    sort_number: f64,
}

/// Pick the single best item to work on, or `None` when nothing is eligible.
pub fn find_next_item(tasks: &[Task]) -> Option<NextItem> {
    let map = IdentityMap::build(tasks);
    let completed = completed_numbers(tasks);

    if let Some(subtask) = eligible_subtasks(tasks, &map, &completed).into_iter().next() {
        return Some(subtask);
    }

    eligible_top_level_tasks(tasks, &map, &completed)
        .into_iter()
        .next()
}

/// Eligible subtasks, best first.
pub fn eligible_subtasks(
    tasks: &[Task],
    map: &IdentityMap,
    completed: &HashSet<String>,
) -> Vec<NextItem> {
    let mut candidates = Vec::new();

    let active_parents = tasks
        .iter()
        .filter(|t| TaskStatus::classify(t.item.status.as_deref()) == Some(TaskStatus::InProgress))
        .filter_map(|t| Some((t, t.item.number_string()?)));

    for (parent, parent_number) in active_parents {
        for st in parent.subtasks() {
            let Some(item_number) = st.number.as_ref() else {
                continue;
            };
            if !is_actionable(st) {
                continue;
            }

            let resolved = map.resolve_all(st.preconditions());
            if !dependencies_satisfied(&resolved, completed) {
                continue;
            }

            let number = item_number.to_string();
            candidates.push(Candidate {
                next: NextItem {
                    title: Some(
                        st.title
                            .clone()
                            .filter(|t| !t.is_empty())
                            .unwrap_or_else(|| format!("Subtask {}", number)),
                    ),
                    number,
                    key: st.key.clone(),
                    status: display_status(st.status.as_deref()),
                    priority: PriorityLevel::effective(&[
                        st.priority.as_deref(),
                        parent.item.priority.as_deref(),
                    ]),
                    precondition: resolved,
                    parent_number: Some(parent_number.clone()),
                },
                sort_number: item_number.as_f64(),
            });
        }
    }

    sorted(candidates)
}

/// Eligible top-level tasks, best first.
pub fn eligible_top_level_tasks(
    tasks: &[Task],
    map: &IdentityMap,
    completed: &HashSet<String>,
) -> Vec<NextItem> {
    let candidates = tasks
        .iter()
        .filter(|t| is_actionable(&t.item))
        .filter_map(|t| {
            let item_number = t.item.number.as_ref()?;
            let resolved = map.resolve_all(t.item.preconditions());
            dependencies_satisfied(&resolved, completed).then(|| Candidate {
                next: NextItem {
                    number: item_number.to_string(),
                    key: t.item.key.clone(),
                    title: t.item.title.clone(),
                    status: display_status(t.item.status.as_deref()),
                    priority: PriorityLevel::effective(&[t.item.priority.as_deref()]),
                    precondition: resolved,
                    parent_number: None,
                },
                sort_number: item_number.as_f64(),
            })
        })
        .collect();

    sorted(candidates)
}

fn is_actionable(item: &Item) -> bool {
    TaskStatus::classify(item.status.as_deref()).is_some_and(|s| s.is_actionable())
}

fn sorted(mut candidates: Vec<Candidate>) -> Vec<NextItem> {
    candidates.sort_by(compare_candidates);
    candidates.into_iter().map(|c| c.next).collect()
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.next
        .priority
        .weight()
        .cmp(&a.next.priority.weight())
        .then_with(|| a.next.precondition.len().cmp(&b.next.precondition.len()))
        .then_with(|| a.sort_number.total_cmp(&b.sort_number))
}
