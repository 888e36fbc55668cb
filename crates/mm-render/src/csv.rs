//! CSV export of the task tree.
//!
//! One row per task in pre-order, each subtask pointing at its parent.

use mm_core::task::{Task, TaskList};

pub const CSV_HEADER: [&str; 6] = [
    "Task ID",
    "Parent Task ID",
    "Task Description",
    "Assignee",
    "Due Date",
    "Status",
];

/// Flatten `tasks` into comma-separated text with a header row.
pub fn render_csv(tasks: &TaskList) -> String {
    let mut lines = Vec::with_capacity(1 + tasks.tasks.len());
    lines.push(CSV_HEADER.join(","));
    for (task, parent) in tasks.preorder() {
        lines.push(task_row(task, parent).join(","));
    }
    lines.join("\n")
}

fn task_row(task: &Task, parent: Option<&str>) -> [String; 6] {
    [
        task.id.clone(),
        parent.unwrap_or_default().to_string(),
        format!("\"{}\"", task.text.replace('"', "\"\"")),
        task.assignee.clone().unwrap_or_default(),
        task.due_date.clone().unwrap_or_default(),
        if task.completed { "Completed" } else { "Pending" }.to_string(),
    ]
}
