//! Application state: the canvas plus the panels around it.
//!
//! `App` is the single object every host handler receives. It owns the
//! canvas, the idea list, the task tree and the key-value store, and it
//! persists the committed snapshot whenever it changes.
//!
//! Generator calls are split into `begin_*` (issues a ticket) and
//! `finish_*` (applies the result if the ticket is still current), so hosts
//! can run them on whatever executor they have.

use crate::canvas::{EventOutcome, MindMapCanvas};
use crate::input::InputEvent;
use crate::requests::{RequestFence, RequestKind, Ticket};
use crate::tools::ToolKind;
use mm_core::config::CanvasConfig;
use mm_core::model::{GeneratedIdea, GeneratedTask, Idea, MindMapState};
use mm_core::persist::{self, KeyValueStore};
use mm_core::task::{Task, TaskList, TaskPatch};
use mm_core::viewport::Origin;
use mm_render::{ExportError, render_csv, render_svg};

/// Shown once per session when the store refuses a write.
pub const STORAGE_ALERT: &str =
    "Could not save to storage. Your browser might be in private mode or has storage disabled.";

pub struct App<S: KeyValueStore> {
    store: S,
    canvas: MindMapCanvas,
    ideas: Vec<Idea>,
    /// Generator output waiting for the user to accept it.
    generated: Vec<Idea>,
    tasks: TaskList,
    ideas_panel_open: bool,
    tasks_panel_open: bool,
    /// Narrow viewport: the idea panel overlays the canvas.
    compact: bool,
    credential: Option<String>,
    alert: Option<String>,
    alerted: bool,
    fence: RequestFence,
}

impl<S: KeyValueStore> App<S> {
    /// Restore the stored snapshot and credential from `store`.
    pub fn new(store: S, config: CanvasConfig) -> Self {
        let initial = persist::load_snapshot(&store);
        let credential = persist::load_credential(&store);
        log::debug!(
            "restored {} nodes, {} connectors",
            initial.nodes.len(),
            initial.connectors.len()
        );
        Self {
            store,
            canvas: MindMapCanvas::new(initial, config),
            ideas: Vec::new(),
            generated: Vec::new(),
            tasks: TaskList::new(),
            ideas_panel_open: true,
            tasks_panel_open: false,
            compact: false,
            credential,
            alert: None,
            alerted: false,
            fence: RequestFence::new(),
        }
    }

    pub fn canvas(&self) -> &MindMapCanvas {
        &self.canvas
    }

    pub fn present(&self) -> &MindMapState {
        self.canvas.present()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ─── Canvas ──────────────────────────────────────────────────────────

    /// Dispatch an input event to the canvas, persisting any commit.
    pub fn handle(&mut self, event: &InputEvent) -> EventOutcome {
        let outcome = self.canvas.handle(event);
        if outcome.snapshot_changed {
            self.persist();
            if matches!(event, InputEvent::Drop { .. }) && self.compact {
                self.ideas_panel_open = false;
            }
        }
        outcome
    }

    /// Run a canvas command, persisting if it changed the snapshot.
    ///
    /// ```ignore
    /// app.edit(|canvas| canvas.set_shape(id, Shape::Ellipse));
    /// ```
    pub fn edit<F>(&mut self, command: F) -> bool
    where
        F: FnOnce(&mut MindMapCanvas) -> bool,
    {
        let changed = command(&mut self.canvas);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        self.edit(MindMapCanvas::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.edit(MindMapCanvas::redo)
    }

    /// Screen position of the canvas surface's top-left corner.
    pub fn set_origin(&mut self, origin: Origin) {
        self.canvas.set_origin(origin);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.canvas.set_tool(tool);
    }

    pub fn close_context_menu(&mut self) {
        self.canvas.close_context_menu();
    }

    /// Empty the canvas after the host has asked the user to confirm.
    pub fn clear_canvas(&mut self, confirmed: bool) -> bool {
        self.edit(|canvas| canvas.clear_canvas(confirmed))
    }

    pub fn export_svg(&self) -> Result<String, ExportError> {
        render_svg(self.canvas.present(), self.canvas.config().export_padding)
    }

    pub fn export_csv(&self) -> String {
        render_csv(&self.tasks)
    }

    fn persist(&mut self) {
        if let Err(e) = persist::save_snapshot(&mut self.store, self.canvas.present()) {
            log::error!("Failed to save state to storage: {e}");
            self.raise_alert(STORAGE_ALERT);
        }
    }

    // ─── Alerts ──────────────────────────────────────────────────────────

    fn raise_alert(&mut self, message: &str) {
        if self.alerted {
            return;
        }
        self.alerted = true;
        self.alert = Some(message.to_string());
    }

    /// The pending user-visible alert, if any. Each alert is returned once.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    // ─── Credential ──────────────────────────────────────────────────────

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Store the generator credential. Returns `false` if the store refused
    /// it, in which case the credential is not adopted.
    pub fn save_credential(&mut self, credential: &str) -> bool {
        let credential = credential.trim();
        if credential.is_empty() {
            return false;
        }
        match persist::save_credential(&mut self.store, credential) {
            Ok(()) => {
                self.credential = Some(credential.to_string());
                true
            }
            Err(e) => {
                log::error!("Failed to save credential: {e}");
                self.raise_alert(STORAGE_ALERT);
                false
            }
        }
    }

    // ─── Panels ──────────────────────────────────────────────────────────

    pub fn ideas_panel_open(&self) -> bool {
        self.ideas_panel_open
    }

    pub fn set_ideas_panel_open(&mut self, open: bool) {
        self.ideas_panel_open = open;
    }

    /// Report a viewport width class change. Wide layouts always show the
    /// idea panel.
    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
        if !compact {
            self.ideas_panel_open = true;
        }
    }

    pub fn tasks_panel_open(&self) -> bool {
        self.tasks_panel_open
    }

    /// Toggle the task panel.
    ///
    /// Opening it with no tasks while the canvas has nodes also starts task
    /// generation; the returned ticket must be passed to `finish_tasks`.
    pub fn toggle_tasks_panel(&mut self) -> Option<Ticket> {
        if !self.tasks_panel_open && self.tasks.is_empty() && !self.present().nodes.is_empty() {
            self.tasks_panel_open = true;
            return Some(self.fence.issue(RequestKind::Tasks));
        }
        self.tasks_panel_open = !self.tasks_panel_open;
        None
    }

    pub fn is_loading(&self, kind: RequestKind) -> bool {
        self.fence.is_pending(kind)
    }

    // ─── Ideas ───────────────────────────────────────────────────────────

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    /// Append an idea. Blank text and case-insensitive duplicates are ignored.
    pub fn add_idea(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        if self.ideas.iter().any(|i| i.text.to_lowercase() == lowered) {
            return false;
        }
        self.ideas.push(Idea::new(text));
        true
    }

    pub fn generated_ideas(&self) -> &[Idea] {
        &self.generated
    }

    /// Start a topic brainstorm. Blank topics issue nothing.
    pub fn begin_brainstorm(&mut self, topic: &str) -> Option<Ticket> {
        if topic.trim().is_empty() {
            return None;
        }
        self.generated.clear();
        Some(self.fence.issue(RequestKind::Ideas))
    }

    /// Start extracting ideas from an uploaded image.
    pub fn begin_image_ideas(&mut self) -> Ticket {
        self.generated.clear();
        self.fence.issue(RequestKind::ImageIdeas)
    }

    /// Stage generator output for review. Stale tickets are ignored.
    pub fn finish_ideas(&mut self, ticket: &Ticket, ideas: Vec<GeneratedIdea>) -> bool {
        if !self.fence.complete(ticket) {
            return false;
        }
        self.generated = ideas.into_iter().map(|g| Idea::new(g.text)).collect();
        true
    }

    /// Move every staged idea into the idea list. Returns how many were new.
    pub fn accept_generated_ideas(&mut self) -> usize {
        let staged = std::mem::take(&mut self.generated);
        staged.iter().filter(|idea| self.add_idea(&idea.text)).count()
    }

    // ─── Tasks ───────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Append a top-level task. Returns its id.
    pub fn add_task(&mut self, text: &str) -> Option<String> {
        self.tasks.add(text).map(|t| t.id.clone())
    }

    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> bool {
        self.tasks.update(id, patch)
    }

    pub fn toggle_task(&mut self, id: &str) -> bool {
        self.tasks.toggle(id)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.tasks.delete(id)
    }

    /// Replace the task list with generator output. Stale tickets are ignored.
    pub fn finish_tasks(&mut self, ticket: &Ticket, tasks: Vec<GeneratedTask>) -> bool {
        if !self.fence.complete(ticket) {
            return false;
        }
        self.tasks = TaskList {
            tasks: tasks.into_iter().map(Task::from).collect(),
        };
        true
    }

    /// Start breaking a task into subtasks. Unknown ids issue nothing.
    pub fn begin_breakdown(&mut self, id: &str) -> Option<Ticket> {
        self.tasks.find(id)?;
        Some(self.fence.issue_keyed(RequestKind::Breakdown, id))
    }

    /// Append generated subtasks under the ticket's task.
    pub fn finish_breakdown(&mut self, ticket: &Ticket, subtasks: Vec<GeneratedTask>) -> bool {
        if !self.fence.complete(ticket) {
            return false;
        }
        let subtasks = subtasks.into_iter().map(Task::from).collect();
        self.tasks.add_subtasks(ticket.key(), subtasks)
    }

    pub fn is_breaking_down(&self, id: &str) -> bool {
        self.fence.is_pending_keyed(RequestKind::Breakdown, id)
    }
}
