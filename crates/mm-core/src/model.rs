//! Core data model for mind maps.
//!
//! A mind map is a flat, ordered list of positioned nodes plus a list of
//! directed connectors between them. The whole thing is one value
//! (`MindMapState`) that is compared, stored in history and persisted as a
//! unit. Node order is insertion order and doubles as z-order: later nodes
//! paint on top of earlier ones.

use crate::id::{ConnectorId, NodeId};
use serde::{Deserialize, Serialize};

// ─── Ideas ───────────────────────────────────────────────────────────────

/// A brainstormed idea, before it is placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: NodeId,
    pub text: String,
}

impl Idea {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            text: text.into(),
        }
    }
}

/// An idea as returned by the idea generator: text only, no identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIdea {
    pub text: String,
}

/// A task as returned by the task generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Outline drawn around a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    Ellipse,
    /// A rectangle rotated 45° about its centre.
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Rectangle, Shape::Ellipse, Shape::Diamond];

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Ellipse => "ellipse",
            Shape::Diamond => "diamond",
        }
    }
}

/// Fill colors offered by the node context menu.
pub const PALETTE_COLORS: [&str; 7] = [
    "#FFFFFF", // White
    "#EFF6FF", // Blue light
    "#E0F2FE", // Cyan light
    "#D1FAE5", // Green light
    "#FEF3C7", // Yellow light
    "#FEE2E2", // Red light
    "#F3E8FF", // Purple light
];

/// Width and height of a measured box, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A placed idea. Position and size are in canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub shape: Shape,
    pub color: String,
}

impl Node {
    /// Place an idea so that its box is centred on `(cx, cy)`.
    pub fn centered(idea: Idea, cx: f64, cy: f64, size: Size, color: &str) -> Self {
        Self {
            id: idea.id,
            text: idea.text,
            x: cx - size.width / 2.0,
            y: cy - size.height / 2.0,
            width: size.width,
            height: size.height,
            shape: Shape::default(),
            color: color.to_string(),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bottom-right corner.
    pub fn max(&self) -> (f64, f64) {
        (self.x + self.width, self.y + self.height)
    }
}

// ─── Connectors ──────────────────────────────────────────────────────────

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: ConnectorId,
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
}

impl Connector {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            id: ConnectorId::between(from, to),
            from_node_id: from,
            to_node_id: to,
        }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.from_node_id == id || self.to_node_id == id
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// One immutable value of the full node/connector set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindMapState {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl MindMapState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connectors.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether a connector `from → to` already exists. Direction matters.
    pub fn has_connector(&self, from: NodeId, to: NodeId) -> bool {
        self.connectors
            .iter()
            .any(|c| c.from_node_id == from && c.to_node_id == to)
    }
}
