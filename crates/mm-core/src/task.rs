//! Actionable task tree.
//!
//! Tasks are generated from a mind map and then edited locally. They live
//! outside the snapshot and are not part of undo history. Trees stay small,
//! so every operation is a recursive search by id.

use crate::id::fresh_id;
use crate::model::GeneratedTask;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<Task>,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            text: text.into(),
            completed: false,
            assignee: None,
            due_date: None,
            subtasks: Vec::new(),
        }
    }
}

impl From<GeneratedTask> for Task {
    fn from(generated: GeneratedTask) -> Self {
        Self {
            completed: generated.completed,
            ..Task::new(generated.text)
        }
    }
}

/// Partial update of a task's own fields. `None` leaves a field unchanged;
/// an empty assignee or due date clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
}

impl TaskPatch {
    fn apply(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = non_empty(assignee);
        }
        if let Some(due) = &self.due_date {
            task.due_date = non_empty(due);
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Ordered forest of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a top-level task. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.tasks.push(Task::new(text));
        self.tasks.last()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        find_in(&self.tasks, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        find_in_mut(&mut self.tasks, id)
    }

    /// Returns `true` if the task was found.
    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                patch.apply(task);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Append subtasks under `id`. Returns `false` if `id` is unknown.
    pub fn add_subtasks(&mut self, id: &str, subtasks: Vec<Task>) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.subtasks.extend(subtasks);
                true
            }
            None => false,
        }
    }

    /// Remove a task (and its whole subtree) wherever it sits.
    pub fn delete(&mut self, id: &str) -> bool {
        delete_in(&mut self.tasks, id)
    }

    /// Pre-order walk yielding `(task, parent_id)`.
    pub fn preorder(&self) -> Vec<(&Task, Option<&str>)> {
        let mut out = Vec::new();
        for task in &self.tasks {
            walk(task, None, &mut out);
        }
        out
    }
}

fn walk<'a>(task: &'a Task, parent: Option<&'a str>, out: &mut Vec<(&'a Task, Option<&'a str>)>) {
    out.push((task, parent));
    for sub in &task.subtasks {
        walk(sub, Some(task.id.as_str()), out);
    }
}

fn find_in<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find_map(|t| {
        if t.id == id {
            Some(t)
        } else {
            find_in(&t.subtasks, id)
        }
    })
}

fn find_in_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_in_mut(&mut task.subtasks, id) {
            return Some(found);
        }
    }
    None
}

fn delete_in(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() != before {
        return true;
    }
    tasks.iter_mut().any(|t| delete_in(&mut t.subtasks, id))
}
