//! Guidance text returned alongside the next-task suggestion.
//!
//! The wording is bilingual (English, then Chinese) and not part of the
//! scheduling contract.

pub const NO_ELIGIBLE_TASK: &str = "No eligible next task found. All tasks are either completed or waiting on unmet preconditions. \
未找到符合条件的下一个任务。所有任务要么已完成，要么存在未满足的依赖关系。";

const SUBTASK_ADVICE: &str = "Subtasks are the place to record timestamps and other details: track progress, mark milestones and note what worked and what failed. \
Update the subtask during research so it reflects the latest findings. \
When picking it up, also read the parent task for the overall context. \
子任务可以通过记录时间戳等细节，帮助在执行过程中跟踪进度、标记里程碑，并总结成功或失败的经验。\
建议在研究阶段及时更新子任务，以收集最新信息。获取任务时，建议同时获取父任务以了解整体背景。";

const TASK_ADVICE: &str = "Top-level tasks may be adjusted as progress and direction change. \
Keep the task current during research; while subtasks track execution details, the top-level task should track overall direction. \
顶级任务可以根据实际进展和方向的变化进行动态调整。建议在研究阶段及时更新任务内容，以确保信息的时效性和准确性。\
在执行子任务时，及时同步子任务的进展；在顶级任务中，则应关注整体方向的调整。";

/// Next-steps text for the chosen item.
pub fn next_steps(is_subtask: bool) -> String {
    let (kind, advice) = if is_subtask {
        ("subtask", SUBTASK_ADVICE)
    } else {
        ("task", TASK_ADVICE)
    };

    format!(
        "When you are ready to start working on this {kind}, set its status to \"in-progress\". \
当准备好开始在 {kind} 上工作时，将任务状态设置为 \"in-progress\"。{advice}"
    )
}
