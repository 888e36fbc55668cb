//! Snapshot mutations.
//!
//! Every committed change to a mind map is a pure `MindMapState →
//! MindMapState` transition. `Mutation` names the transitions the canvas
//! issues; `apply` never touches its input, and returns an equal snapshot
//! when the mutation does not apply (unknown id, duplicate edge, ...), which
//! history then treats as a no-op.

use crate::id::NodeId;
use crate::model::{Connector, MindMapState, Node, Shape, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Append a node. Ignored if a node with the same id exists.
    AddNode { node: Box<Node> },
    /// Append several nodes at once, skipping ids already present.
    AddNodes { nodes: Vec<Node> },
    /// Set a node's canvas origin.
    MoveNode { id: NodeId, x: f64, y: f64 },
    /// Replace a node's label together with its re-measured size.
    SetText { id: NodeId, text: String, size: Size },
    SetShape { id: NodeId, shape: Shape },
    SetColor { id: NodeId, color: String },
    /// Remove a node and every connector touching it.
    RemoveNode { id: NodeId },
    /// Append a connector. Rejected for self-loops, unknown endpoints and
    /// duplicates of an existing `from → to` pair.
    AddConnector { connector: Connector },
    /// Replace everything with the empty snapshot.
    Clear,
}

impl Mutation {
    /// Short human-readable label, used in logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::AddNode { .. } => "add node",
            Mutation::AddNodes { .. } => "import nodes",
            Mutation::MoveNode { .. } => "move node",
            Mutation::SetText { .. } => "edit text",
            Mutation::SetShape { .. } => "change shape",
            Mutation::SetColor { .. } => "change color",
            Mutation::RemoveNode { .. } => "delete node",
            Mutation::AddConnector { .. } => "connect nodes",
            Mutation::Clear => "clear canvas",
        }
    }

    pub fn apply(&self, state: &MindMapState) -> MindMapState {
        let mut next = state.clone();
        match self {
            Mutation::AddNode { node } => {
                if !next.contains_node(node.id) {
                    next.nodes.push((**node).clone());
                }
            }
            Mutation::AddNodes { nodes } => {
                for node in nodes {
                    if !next.contains_node(node.id) {
                        next.nodes.push(node.clone());
                    }
                }
            }
            Mutation::MoveNode { id, x, y } => {
                if let Some(node) = next.node_mut(*id) {
                    node.x = *x;
                    node.y = *y;
                }
            }
            Mutation::SetText { id, text, size } => {
                if let Some(node) = next.node_mut(*id) {
                    node.text = text.clone();
                    node.width = size.width;
                    node.height = size.height;
                }
            }
            Mutation::SetShape { id, shape } => {
                if let Some(node) = next.node_mut(*id) {
                    node.shape = *shape;
                }
            }
            Mutation::SetColor { id, color } => {
                if let Some(node) = next.node_mut(*id) {
                    node.color = color.clone();
                }
            }
            Mutation::RemoveNode { id } => {
                next.nodes.retain(|n| n.id != *id);
                next.connectors.retain(|c| !c.touches(*id));
            }
            Mutation::AddConnector { connector } => {
                let (from, to) = (connector.from_node_id, connector.to_node_id);
                if can_connect(&next, from, to) {
                    next.connectors.push(connector.clone());
                }
            }
            Mutation::Clear => next = MindMapState::default(),
        }
        next
    }
}

/// Whether a new connector `from → to` would be accepted.
pub fn can_connect(state: &MindMapState, from: NodeId, to: NodeId) -> bool {
    from != to
        && state.contains_node(from)
        && state.contains_node(to)
        && !state.has_connector(from, to)
}
