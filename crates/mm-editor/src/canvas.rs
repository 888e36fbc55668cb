//! Interaction state machine for the mind-map canvas.
//!
//! `MindMapCanvas` owns the undo history, the view transform and the
//! current pointer mode. Hosts feed it normalized `InputEvent`s and redraw
//! from `displayed()`:
//!
//! - **Idle**: nothing in progress.
//! - **Panning**: pointer went down on empty canvas; moves pan the view.
//! - **DraggingNode**: pointer went down on a node with the select tool.
//!   Moves update a transient working copy; one commit happens on release.
//! - **Connecting**: the connect tool has picked a source node and waits
//!   for the target click.
//! - **EditingText**: the inline label editor is open on a node.
//!
//! View changes (pan, zoom) are never committed to history.

use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::ToolKind;
use mm_core::config::CanvasConfig;
use mm_core::id::{ConnectorId, NodeId};
use mm_core::measure::{TextMeasure, TextMetrics};
use mm_core::model::{Connector, Idea, MindMapState, Node, Shape};
use mm_core::mutation::{Mutation, can_connect};
use mm_core::viewport::{Origin, ViewTransform};
use mm_render::hit_test;

/// Current pointer/keyboard mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Panning,
    DraggingNode {
        id: NodeId,
        /// Canvas cursor minus node origin at grab time.
        grab_dx: f64,
        grab_dy: f64,
    },
    Connecting {
        source: NodeId,
    },
    EditingText {
        id: NodeId,
        buffer: String,
    },
}

/// The open node context menu, anchored at a screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
}

/// What an event did, so hosts know whether to repaint or persist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub redraw: bool,
    /// The committed snapshot changed (commit, undo or redo).
    pub snapshot_changed: bool,
}

impl EventOutcome {
    const NONE: EventOutcome = EventOutcome {
        redraw: false,
        snapshot_changed: false,
    };
    const REDRAW: EventOutcome = EventOutcome {
        redraw: true,
        snapshot_changed: false,
    };

    fn committed(changed: bool) -> Self {
        Self {
            redraw: true,
            snapshot_changed: changed,
        }
    }

    pub fn merge(self, other: EventOutcome) -> Self {
        Self {
            redraw: self.redraw || other.redraw,
            snapshot_changed: self.snapshot_changed || other.snapshot_changed,
        }
    }
}

/// The editable canvas.
pub struct MindMapCanvas {
    history: History,
    /// Uncommitted copy of the present, alive only while dragging.
    transient: Option<MindMapState>,
    view: ViewTransform,
    origin: Origin,
    tool: ToolKind,
    interaction: Interaction,
    selected: Option<NodeId>,
    context_menu: Option<ContextMenu>,
    config: CanvasConfig,
    measure: Box<dyn TextMeasure>,
}

impl Default for MindMapCanvas {
    fn default() -> Self {
        Self::new(MindMapState::default(), CanvasConfig::default())
    }
}

impl MindMapCanvas {
    /// Create a canvas whose history starts at `initial`.
    pub fn new(initial: MindMapState, config: CanvasConfig) -> Self {
        Self {
            history: History::new(initial).with_max_depth(config.history_depth),
            transient: None,
            view: ViewTransform::default(),
            origin: Origin::default(),
            tool: ToolKind::Select,
            interaction: Interaction::Idle,
            selected: None,
            context_menu: None,
            config,
            measure: Box::new(TextMetrics::default()),
        }
    }

    /// Replace the text measurer (a DOM-backed one in the browser).
    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// The last committed snapshot.
    pub fn present(&self) -> &MindMapState {
        self.history.present()
    }

    /// What should be painted: the drag working copy if any, else the present.
    pub fn displayed(&self) -> &MindMapState {
        self.transient.as_ref().unwrap_or(self.history.present())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Screen position of the canvas element's top-left corner.
    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.context_menu
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Switch tools. Leaving the connect tool drops any pending source;
    /// re-selecting the active tool changes nothing.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool == tool {
            return;
        }
        if matches!(self.interaction, Interaction::Connecting { .. }) {
            self.interaction = Interaction::Idle;
        }
        log::debug!("tool: {} → {}", self.tool.as_str(), tool.as_str());
        self.tool = tool;
    }

    pub fn undo(&mut self) -> bool {
        self.abort_gesture();
        let changed = self.history.undo();
        if changed {
            self.forget_missing();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.abort_gesture();
        let changed = self.history.redo();
        if changed {
            self.forget_missing();
        }
        changed
    }

    /// Place `idea` centred on the screen point `(sx, sy)`.
    ///
    /// Returns `false` without committing if a node with the idea's id is
    /// already on the canvas.
    pub fn drop_idea(&mut self, idea: Idea, sx: f64, sy: f64) -> bool {
        if self.present().contains_node(idea.id) {
            log::debug!("idea {} already on canvas", idea.id);
            return false;
        }
        let (cx, cy) = self.to_canvas(sx, sy);
        let size = self.measure.measure(&idea.text);
        let mut node = Node::centered(idea, cx, cy, size, &self.config.default_color);
        node.shape = self.config.default_shape;
        self.commit(Mutation::AddNode {
            node: Box::new(node),
        })
    }

    /// Lay out every idea not yet on the canvas in a row below the existing
    /// content, as one commit. Returns the number of nodes added.
    pub fn import_ideas(&mut self, ideas: &[Idea]) -> usize {
        let spacing = self.config.import_spacing;
        let present = self.present();
        let top = present
            .nodes
            .iter()
            .map(|n| n.y + n.height + spacing)
            .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))))
            .unwrap_or(0.0);
        let left = present.nodes.iter().map(|n| n.x).fold(f64::INFINITY, f64::min);
        let mut x = if left.is_finite() { left } else { 0.0 };

        let mut nodes: Vec<Node> = Vec::new();
        for idea in ideas {
            if present.contains_node(idea.id) || nodes.iter().any(|n| n.id == idea.id) {
                continue;
            }
            let size = self.measure.measure(&idea.text);
            nodes.push(Node {
                id: idea.id,
                text: idea.text.clone(),
                x,
                y: top,
                width: size.width,
                height: size.height,
                shape: self.config.default_shape,
                color: self.config.default_color.clone(),
            });
            x += size.width + spacing;
        }

        let added = nodes.len();
        if added > 0 {
            self.commit(Mutation::AddNodes { nodes });
        }
        added
    }

    /// Replace a node's label, re-measuring its box. Blank text is ignored.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        if text.trim().is_empty() || !self.present().contains_node(id) {
            return false;
        }
        let size = self.measure.measure(text);
        self.commit(Mutation::SetText {
            id,
            text: text.to_string(),
            size,
        })
    }

    pub fn set_shape(&mut self, id: NodeId, shape: Shape) -> bool {
        self.context_menu = None;
        self.commit(Mutation::SetShape { id, shape })
    }

    pub fn set_color(&mut self, id: NodeId, color: &str) -> bool {
        self.context_menu = None;
        self.commit(Mutation::SetColor {
            id,
            color: color.to_string(),
        })
    }

    /// Remove a node and every connector touching it.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        self.context_menu = None;
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.commit(Mutation::RemoveNode { id })
    }

    /// Connect `from` → `to`. Self-loops and duplicate edges are rejected.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        if !can_connect(self.present(), from, to) {
            log::debug!("connector {from} → {to} rejected");
            return false;
        }
        self.commit(Mutation::AddConnector {
            connector: Connector {
                id: ConnectorId::between(from, to),
                from_node_id: from,
                to_node_id: to,
            },
        })
    }

    /// Empty the canvas as one undoable commit. Does nothing unless the user
    /// confirmed.
    pub fn clear_canvas(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.abort_gesture();
        self.selected = None;
        self.context_menu = None;
        self.commit(Mutation::Clear)
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Route one input event through the state machine.
    pub fn handle(&mut self, event: &InputEvent) -> EventOutcome {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(*x, *y),
            InputEvent::PointerMove { x, y, dx, dy } => self.pointer_move(*x, *y, *dx, *dy),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Click { x, y } => self.click(*x, *y),
            InputEvent::DoubleClick { x, y } => self.double_click(*x, *y),
            InputEvent::ContextMenu { x, y } => self.open_context_menu(*x, *y),
            InputEvent::Wheel { x, y, delta_y } => {
                if self.view.zoom_at(self.origin, *x, *y, *delta_y, &self.config) {
                    EventOutcome::REDRAW
                } else {
                    EventOutcome::NONE
                }
            }
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
            InputEvent::TextInput { text } => {
                if let Interaction::EditingText { buffer, .. } = &mut self.interaction {
                    buffer.clone_from(text);
                    EventOutcome::REDRAW
                } else {
                    EventOutcome::NONE
                }
            }
            InputEvent::Blur => self.finish_editing(),
            InputEvent::Drop { idea, x, y } => {
                let changed = self.drop_idea(idea.clone(), *x, *y);
                EventOutcome::committed(changed)
            }
        }
    }

    fn pointer_down(&mut self, x: f64, y: f64) -> EventOutcome {
        self.context_menu = None;
        let hit = self.hit(x, y);
        let mut outcome = EventOutcome::REDRAW;

        if self.is_editing() {
            if hit.is_some() {
                return EventOutcome::NONE;
            }
            // Pressing outside the editor blurs it.
            outcome = self.finish_editing();
        }

        match hit {
            None => {
                self.selected = None;
                if self.tool == ToolKind::Connect {
                    log::debug!("pending connector source cleared");
                }
                self.interaction = Interaction::Panning;
            }
            Some(id) if self.tool == ToolKind::Select => {
                let Some((nx, ny)) = self.present().node(id).map(|n| (n.x, n.y)) else {
                    return outcome;
                };
                let (cx, cy) = self.to_canvas(x, y);
                self.interaction = Interaction::DraggingNode {
                    id,
                    grab_dx: cx - nx,
                    grab_dy: cy - ny,
                };
                self.transient = Some(self.present().clone());
            }
            Some(_) => {}
        }
        outcome.merge(EventOutcome::REDRAW)
    }

    fn pointer_move(&mut self, x: f64, y: f64, dx: f64, dy: f64) -> EventOutcome {
        match self.interaction {
            Interaction::Panning => {
                self.view.pan_by(dx, dy);
                EventOutcome::REDRAW
            }
            Interaction::DraggingNode {
                id,
                grab_dx,
                grab_dy,
            } => {
                let (cx, cy) = self.to_canvas(x, y);
                if let Some(node) = self.transient.as_mut().and_then(|s| s.node_mut(id)) {
                    node.x = cx - grab_dx;
                    node.y = cy - grab_dy;
                }
                EventOutcome::REDRAW
            }
            _ => EventOutcome::NONE,
        }
    }

    fn pointer_up(&mut self) -> EventOutcome {
        match std::mem::take(&mut self.interaction) {
            Interaction::Panning => EventOutcome::REDRAW,
            Interaction::DraggingNode { id, .. } => {
                let released = self.transient.take().and_then(|s| s.node(id).map(|n| (n.x, n.y)));
                let changed = match released {
                    Some((x, y)) => self.commit(Mutation::MoveNode { id, x, y }),
                    None => false,
                };
                EventOutcome::committed(changed)
            }
            other => {
                // Releases outside a gesture leave connecting/editing alone.
                self.interaction = other;
                EventOutcome::NONE
            }
        }
    }

    fn click(&mut self, x: f64, y: f64) -> EventOutcome {
        let Some(id) = self.hit(x, y) else {
            return EventOutcome::NONE;
        };
        if self.is_editing() {
            return EventOutcome::NONE;
        }
        match self.tool {
            ToolKind::Select => {
                self.selected = Some(id);
                EventOutcome::REDRAW
            }
            ToolKind::Connect => match self.interaction {
                Interaction::Connecting { source } => {
                    let changed = self.connect(source, id);
                    self.interaction = Interaction::Idle;
                    self.set_tool(ToolKind::Select);
                    EventOutcome::committed(changed)
                }
                _ => {
                    log::debug!("connecting from {id}");
                    self.interaction = Interaction::Connecting { source: id };
                    EventOutcome::REDRAW
                }
            },
        }
    }

    fn double_click(&mut self, x: f64, y: f64) -> EventOutcome {
        if self.is_editing() {
            return EventOutcome::NONE;
        }
        let Some((id, text)) = self
            .hit(x, y)
            .and_then(|id| self.present().node(id))
            .map(|n| (n.id, n.text.clone()))
        else {
            return EventOutcome::NONE;
        };
        self.context_menu = None;
        self.interaction = Interaction::EditingText { id, buffer: text };
        EventOutcome::REDRAW
    }

    fn open_context_menu(&mut self, x: f64, y: f64) -> EventOutcome {
        if self.is_editing() {
            return EventOutcome::NONE;
        }
        match self.hit(x, y) {
            Some(node) => {
                self.selected = Some(node);
                self.context_menu = Some(ContextMenu { node, x, y });
            }
            None => self.context_menu = None,
        }
        EventOutcome::REDRAW
    }

    fn key(&mut self, key: &str, modifiers: Modifiers) -> EventOutcome {
        if self.is_editing() {
            return match key {
                "Enter" if !modifiers.shift => self.finish_editing(),
                "Escape" => {
                    self.interaction = Interaction::Idle;
                    EventOutcome::REDRAW
                }
                _ => EventOutcome::NONE,
            };
        }

        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return EventOutcome::NONE;
        };
        match action {
            ShortcutAction::Undo => EventOutcome::committed(self.undo()),
            ShortcutAction::Redo => EventOutcome::committed(self.redo()),
            ShortcutAction::ToolSelect => {
                self.set_tool(ToolKind::Select);
                EventOutcome::REDRAW
            }
            ShortcutAction::ToolConnect => {
                self.set_tool(ToolKind::Connect);
                EventOutcome::REDRAW
            }
            ShortcutAction::Delete => match self.selected {
                Some(id) => EventOutcome::committed(self.delete_node(id)),
                None => EventOutcome::NONE,
            },
            ShortcutAction::Cancel => {
                if matches!(self.interaction, Interaction::Connecting { .. }) {
                    self.interaction = Interaction::Idle;
                }
                self.selected = None;
                self.context_menu = None;
                EventOutcome::REDRAW
            }
        }
    }

    /// Close the label editor, committing its buffer when it isn't blank.
    fn finish_editing(&mut self) -> EventOutcome {
        let Interaction::EditingText { id, buffer } = std::mem::take(&mut self.interaction) else {
            return EventOutcome::NONE;
        };
        let changed = self.set_text(id, &buffer);
        EventOutcome::committed(changed)
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    /// Commit `mutation`. Any other edit ends a drag in progress, which
    /// keeps the node where it was last committed.
    fn commit(&mut self, mutation: Mutation) -> bool {
        if let Interaction::DraggingNode { id, .. } = self.interaction {
            log::debug!("drag of {id} ended by {}", mutation.describe());
            self.interaction = Interaction::Idle;
        }
        self.transient = None;
        self.history.apply(&mutation)
    }

    fn is_editing(&self) -> bool {
        matches!(self.interaction, Interaction::EditingText { .. })
    }

    fn to_canvas(&self, sx: f64, sy: f64) -> (f64, f64) {
        self.view.screen_to_canvas(self.origin, sx, sy)
    }

    fn hit(&self, sx: f64, sy: f64) -> Option<NodeId> {
        let (cx, cy) = self.to_canvas(sx, sy);
        hit_test(self.displayed(), cx, cy)
    }

    /// Drop an in-flight drag or edit without committing.
    fn abort_gesture(&mut self) {
        self.transient = None;
        if matches!(
            self.interaction,
            Interaction::DraggingNode { .. } | Interaction::EditingText { .. }
        ) {
            self.interaction = Interaction::Idle;
        }
    }

    /// Drop references to nodes that no longer exist in the present.
    fn forget_missing(&mut self) {
        let present = self.history.present();
        if self.selected.is_some_and(|id| !present.contains_node(id)) {
            self.selected = None;
        }
        if self.context_menu.is_some_and(|m| !present.contains_node(m.node)) {
            self.context_menu = None;
        }
        if let Interaction::Connecting { source } = self.interaction
            && !present.contains_node(source)
        {
            self.interaction = Interaction::Idle;
        }
    }
}
