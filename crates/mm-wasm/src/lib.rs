//! WASM bridge: exposes the mind-map editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards DOM
//! events to [`MindMapHandle`], repaints from `state_json`/`ui_json`, and
//! performs generator requests itself, handing results back by ticket.

mod json;
mod storage;
mod tickets;

use mm_core::config::CanvasConfig;
use mm_core::id::NodeId;
use mm_core::model::{GeneratedIdea, GeneratedTask, Idea, Shape};
use mm_core::task::TaskPatch;
use mm_core::viewport::Origin;
use mm_editor::{App, EventOutcome, InputEvent, Modifiers, ToolKind};
use serde::de::DeserializeOwned;
use serde_json::json;
use storage::LocalStorage;
use tickets::TicketBook;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// Event methods return `true` when the page should repaint.
#[wasm_bindgen]
pub struct MindMapHandle {
    app: App<LocalStorage>,
    tickets: TicketBook,
}

#[wasm_bindgen]
impl MindMapHandle {
    /// Restore the editor from `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            app: App::new(LocalStorage::open(), CanvasConfig::default()),
            tickets: TicketBook::default(),
        }
    }

    // ─── Canvas events ───────────────────────────────────────────────────

    /// Screen position of the canvas element's top-left corner.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.app.set_origin(Origin { x, y });
    }

    /// Report whether the viewport is narrow (idea panel overlays the canvas).
    pub fn set_compact(&mut self, compact: bool) {
        self.app.set_compact(compact);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::PointerDown { x, y })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, dx: f64, dy: f64) -> bool {
        self.dispatch(InputEvent::PointerMove { x, y, dx, dy })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::PointerUp { x, y })
    }

    pub fn click(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::Click { x, y })
    }

    pub fn double_click(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::DoubleClick { x, y })
    }

    pub fn context_menu(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::ContextMenu { x, y })
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        self.dispatch(InputEvent::Wheel { x, y, delta_y })
    }

    pub fn key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.dispatch(InputEvent::key_with(key, modifiers))
    }

    pub fn text_input(&mut self, text: &str) -> bool {
        self.dispatch(InputEvent::TextInput {
            text: text.to_string(),
        })
    }

    pub fn blur(&mut self) -> bool {
        self.dispatch(InputEvent::Blur)
    }

    /// An idea from the panel was dropped at screen `(x, y)`.
    pub fn drop_idea(&mut self, id: &str, text: &str, x: f64, y: f64) -> bool {
        let idea = Idea {
            id: NodeId::intern(id),
            text: text.to_string(),
        };
        self.dispatch(InputEvent::Drop { idea, x, y })
    }

    // ─── Canvas commands ─────────────────────────────────────────────────

    pub fn set_tool(&mut self, name: &str) {
        let tool = ToolKind::from_name(name).unwrap_or_default();
        self.app.set_tool(tool);
    }

    pub fn undo(&mut self) -> bool {
        self.app.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.app.redo()
    }

    /// Call after the user confirmed the "clear canvas" prompt.
    pub fn clear_canvas(&mut self, confirmed: bool) -> bool {
        self.app.clear_canvas(confirmed)
    }

    pub fn set_shape(&mut self, node_id: &str, shape: &str) -> bool {
        let Some(shape) = Shape::ALL.into_iter().find(|s| s.as_str() == shape) else {
            return false;
        };
        let id = NodeId::intern(node_id);
        self.app.edit(|canvas| canvas.set_shape(id, shape))
    }

    pub fn set_color(&mut self, node_id: &str, color: &str) -> bool {
        let id = NodeId::intern(node_id);
        self.app.edit(|canvas| canvas.set_color(id, color))
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let id = NodeId::intern(node_id);
        self.app.edit(|canvas| canvas.delete_node(id))
    }

    pub fn close_context_menu(&mut self) {
        self.app.close_context_menu();
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// The snapshot to paint (includes an in-progress drag).
    pub fn state_json(&self) -> String {
        json::state(self.app.canvas().displayed())
    }

    pub fn ui_json(&self) -> String {
        json::ui(&self.app).to_string()
    }

    pub fn ideas_json(&self) -> String {
        serde_json::to_string(self.app.ideas()).unwrap_or_else(|_| "[]".into())
    }

    pub fn generated_ideas_json(&self) -> String {
        serde_json::to_string(self.app.generated_ideas()).unwrap_or_else(|_| "[]".into())
    }

    pub fn tasks_json(&self) -> String {
        serde_json::to_string(self.app.tasks()).unwrap_or_else(|_| "[]".into())
    }

    /// `{"ok":true,"svg":"..."}` or `{"ok":false,"error":"..."}`.
    pub fn export_svg(&self) -> String {
        match self.app.export_svg() {
            Ok(svg) => json::ok(json!({ "svg": svg })),
            Err(e) => json::error(&e.to_string()),
        }
    }

    pub fn export_csv(&self) -> String {
        self.app.export_csv()
    }

    /// The pending one-time alert, or an empty string.
    pub fn take_alert(&mut self) -> String {
        self.app.take_alert().unwrap_or_default()
    }

    // ─── Credential ──────────────────────────────────────────────────────

    pub fn credential(&self) -> String {
        self.app.credential().unwrap_or_default().to_string()
    }

    pub fn save_credential(&mut self, credential: &str) -> bool {
        self.app.save_credential(credential)
    }

    // ─── Ideas ───────────────────────────────────────────────────────────

    pub fn add_idea(&mut self, text: &str) -> bool {
        self.app.add_idea(text)
    }

    pub fn accept_generated_ideas(&mut self) -> u32 {
        self.app.accept_generated_ideas() as u32
    }

    /// Returns a ticket id, or 0 when the topic is blank.
    pub fn begin_brainstorm(&mut self, topic: &str) -> u32 {
        let ticket = self.app.begin_brainstorm(topic);
        self.tickets.register(ticket)
    }

    pub fn begin_image_ideas(&mut self) -> u32 {
        let ticket = self.app.begin_image_ideas();
        self.tickets.register(Some(ticket))
    }

    /// `ideas` is a JSON array of `{"text": ...}`.
    pub fn finish_ideas(&mut self, ticket: u32, ideas: &str) -> bool {
        let Some(ticket) = self.tickets.take(ticket) else {
            return false;
        };
        let ideas: Vec<GeneratedIdea> = parse_list(ideas);
        self.app.finish_ideas(&ticket, ideas)
    }

    // ─── Tasks ───────────────────────────────────────────────────────────

    /// Returns a ticket id when opening the panel starts task generation, else 0.
    pub fn toggle_tasks_panel(&mut self) -> u32 {
        let ticket = self.app.toggle_tasks_panel();
        self.tickets.register(ticket)
    }

    /// `tasks` is a JSON array of `{"text": ..., "completed": ...}`.
    pub fn finish_tasks(&mut self, ticket: u32, tasks: &str) -> bool {
        let Some(ticket) = self.tickets.take(ticket) else {
            return false;
        };
        let tasks: Vec<GeneratedTask> = parse_list(tasks);
        self.app.finish_tasks(&ticket, tasks)
    }

    /// Returns the new task's id, or an empty string for blank text.
    pub fn add_task(&mut self, text: &str) -> String {
        self.app.add_task(text).unwrap_or_default()
    }

    /// `patch` is a JSON object with any of `text`, `completed`, `assignee`, `dueDate`.
    pub fn update_task(&mut self, id: &str, patch: &str) -> bool {
        match serde_json::from_str::<TaskPatch>(patch) {
            Ok(patch) => self.app.update_task(id, &patch),
            Err(e) => {
                log::warn!("Ignoring malformed task patch: {e}");
                false
            }
        }
    }

    pub fn toggle_task(&mut self, id: &str) -> bool {
        self.app.toggle_task(id)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.app.delete_task(id)
    }

    pub fn begin_breakdown(&mut self, id: &str) -> u32 {
        let ticket = self.app.begin_breakdown(id);
        self.tickets.register(ticket)
    }

    pub fn finish_breakdown(&mut self, ticket: u32, subtasks: &str) -> bool {
        let Some(ticket) = self.tickets.take(ticket) else {
            return false;
        };
        let subtasks: Vec<GeneratedTask> = parse_list(subtasks);
        self.app.finish_breakdown(&ticket, subtasks)
    }
}

impl Default for MindMapHandle {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl MindMapHandle {
    fn dispatch(&mut self, event: InputEvent) -> bool {
        let EventOutcome { redraw, .. } = self.app.handle(&event);
        redraw
    }
}

/// Parse a generator result list; anything malformed counts as empty.
fn parse_list<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed generator result: {e}");
        Vec::new()
    })
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("MM WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no editor needed) ────────────────────────────

/// Lint a serialized snapshot. Returns JSON
/// `{"ok":true,"diagnostics":[{"rule","subject","message","severity"}]}` or
/// `{"ok":false,"error":"..."}` when it doesn't parse.
#[wasm_bindgen]
pub fn validate_snapshot(source: &str) -> String {
    match mm_core::persist::decode_snapshot(source) {
        Ok(state) => {
            let diagnostics: Vec<serde_json::Value> = mm_core::lint::lint_snapshot(&state)
                .into_iter()
                .map(|d| {
                    json!({
                        "rule": d.rule,
                        "subject": d.subject,
                        "message": d.message,
                        "severity": format!("{:?}", d.severity).to_lowercase(),
                    })
                })
                .collect();
            json::ok(json!({ "diagnostics": diagnostics }))
        }
        Err(e) => json::error(&e.to_string()),
    }
}
