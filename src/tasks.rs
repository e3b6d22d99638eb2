use crate::dependencies::check_preconditions;
use crate::document::models::{
    CascadedChange, Item, ItemKind, NextItem, ResetRecord, ResetSummary, StatusUpdate, Task,
    TaskDocument,
};
use crate::error::{Result, TaskError};
use crate::identity::{item_at, item_at_mut, locate, IdentityMap, ItemLocation, LocatedItem};
use crate::scheduler::find_next_item;
use crate::status::{display_status, is_terminal_success, TaskStatus, DEFAULT_STATUS};

/// Operates on one loaded task document for the duration of one operation.
pub struct TaskManager<'a> {
    doc: &'a mut TaskDocument,
}

impl<'a> TaskManager<'a> {
    pub fn new(doc: &'a mut TaskDocument) -> Self {
        Self { doc }
    }

    /// The next item to work on, if any.
    pub fn pick_next(&self) -> Option<NextItem> {
        find_next_item(&self.doc.tasks)
    }

    /// Set `new_status` on every identifier (key or number), in order.
    ///
    /// The status is validated before anything changes. Every identifier is
    /// resolved before the first mutation, so an unknown identifier fails the
    /// whole batch and leaves the document untouched.
    ///
    /// Unsatisfied preconditions never block the transition; they are logged
    /// and returned as warnings.
    pub fn set_status(&mut self, identifiers: &[String], new_status: &str) -> Result<Vec<StatusUpdate>> {
        let requested = TaskStatus::parse_requested(new_status)?;

        let map = IdentityMap::build(&self.doc.tasks);
        let targets = identifiers
            .iter()
            .map(|id| {
                locate(id, &self.doc.tasks, &map)
                    .map(|found| (id, found))
                    .ok_or_else(|| TaskError::TaskNotFound(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut updates = Vec::with_capacity(targets.len());
        for (identifier, found) in targets {
            updates.push(self.apply_status(identifier, &found, requested, new_status, &map));
        }

        Ok(updates)
    }

    fn apply_status(
        &mut self,
        identifier: &str,
        found: &LocatedItem,
        requested: TaskStatus,
        new_status: &str,
        map: &IdentityMap,
    ) -> StatusUpdate {
        let mut warnings = Vec::new();
        let full_number = &found.full_number;

        if requested == TaskStatus::InProgress || requested.is_terminal_success() {
            let target = item_at(&self.doc.tasks, found.location);
            let report = check_preconditions(target, &self.doc.tasks, map);
            if !report.satisfied {
                let details = report
                    .unsatisfied
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let warning = format!(
                    "Task {} has unsatisfied preconditions: {}. Proceeding anyway.",
                    full_number, details
                );
                tracing::warn!(task = %full_number, "{}", warning);
                warnings.push(warning);
            }
        }

        let target = item_at_mut(&mut self.doc.tasks, found.location);
        let previous_status = display_status(target.status.as_deref());
        target.status = Some(new_status.to_string());
        let key = target.key.clone();
        let title = target.title.clone();

        let kind = match found.location {
            ItemLocation::Task(_) => "task",
            ItemLocation::Subtask { .. } => "subtask",
        };
        tracing::info!(
            kind,
            number = %full_number,
            key = key.as_deref().unwrap_or("N/A"),
            from = %previous_status,
            to = %new_status,
            "Updated status"
        );

        let mut cascaded = Vec::new();
        match found.location {
            ItemLocation::Subtask { task, .. } => {
                if requested.is_terminal_success() {
                    if let Some(hint) = self.parent_completion_hint(task) {
                        tracing::warn!(task = %found.full_number, "{}", hint);
                        warnings.push(hint);
                    }
                }
            },
            ItemLocation::Task(task) => {
                cascaded = cascade_to_subtasks(&mut self.doc.tasks[task], requested, new_status);
                if !cascaded.is_empty() {
                    tracing::info!(
                        number = %full_number,
                        count = cascaded.len(),
                        to = %new_status,
                        "Cascaded status to subtasks"
                    );
                }
            },
        }

        StatusUpdate {
            identifier: identifier.to_string(),
            number: full_number.clone(),
            key,
            title,
            status: new_status.to_string(),
            previous_status,
            warnings,
            cascaded,
        }
    }

    /// Advisory text when every subtask of `task` is complete but the task
    /// itself is not. The parent is never changed automatically.
    fn parent_completion_hint(&self, task: usize) -> Option<String> {
        let parent = &self.doc.tasks[task];
        let parent_number = parent.item.number.as_ref()?;
        let all_done = parent
            .subtasks()
            .iter()
            .all(|st| is_terminal_success(st.status.as_deref()));

        (all_done && !is_terminal_success(parent.item.status.as_deref())).then(|| {
            format!(
                "All subtasks for task {} are done. Suggest updating parent task status to 'done'",
                parent_number
            )
        })
    }

    /// Reset every task and subtask to `pending` with an empty result.
    pub fn reset_all(&mut self) -> ResetSummary {
        let mut reset_tasks = Vec::new();
        let mut reset_subtasks = Vec::new();

        for task in &mut self.doc.tasks {
            let parent_number = task.item.number_string();
            reset_tasks.push(reset_item(&mut task.item, ItemKind::Task, None));

            for st in task.subtasks_mut() {
                reset_subtasks.push(reset_item(st, ItemKind::Subtask, parent_number.clone()));
            }
        }

        let total_tasks = reset_tasks.len();
        let total_subtasks = reset_subtasks.len();
        ResetSummary {
            reset_tasks,
            reset_subtasks,
            total_tasks,
            total_subtasks,
            total_items: total_tasks + total_subtasks,
        }
    }
}

/// Apply the downward cascade rules for a top-level task.
///
/// - terminal-success: every subtask not yet complete takes the new status.
/// - `pending`: every completed subtask goes back to `pending`.
fn cascade_to_subtasks(task: &mut Task, requested: TaskStatus, new_status: &str) -> Vec<CascadedChange> {
    let affected: fn(&Item) -> bool = if requested.is_terminal_success() {
        |st: &Item| !is_terminal_success(st.status.as_deref())
    } else if requested == TaskStatus::Pending {
        |st: &Item| is_terminal_success(st.status.as_deref())
    } else {
        return Vec::new();
    };

    task.subtasks_mut()
        .iter_mut()
        .filter(|st| affected(st))
        .map(|st| {
            let previous_status = display_status(st.status.as_deref());
            st.status = Some(new_status.to_string());
            CascadedChange {
                number: st.number_string(),
                key: st.key.clone(),
                previous_status,
                status: new_status.to_string(),
            }
        })
        .collect()
}

fn reset_item(item: &mut Item, kind: ItemKind, parent_number: Option<String>) -> ResetRecord {
    let previous_status = display_status(item.status.as_deref());
    let previous_result = item.result.clone().unwrap_or_default();

    let number = item.number_string();

    item.status = Some(DEFAULT_STATUS.to_string());
    item.result = Some(String::new());

    tracing::info!(
        kind = ?kind,
        number = number.as_deref().unwrap_or("N/A"),
        key = item.key().unwrap_or("N/A"),
        from = %previous_status,
        previous_result = %previous_result,
        "Reset item to pending"
    );

    ResetRecord {
        key: item.key.clone(),
        number,
        previous_status,
        previous_result,
        kind,
        parent_number,
    }
}
