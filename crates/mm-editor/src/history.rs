//! Undo/Redo history.
//!
//! History is snapshot-based: every committed change stores the whole
//! previous `MindMapState`, so undo and redo simply swap snapshots. There
//! are no inverse mutations to compute.
//!
//! `commit` is the only way a change enters history. A commit whose result
//! equals the present snapshot is dropped, which keeps no-op gestures
//! (a click without a drag, a rejected connector) out of the undo stack.

use mm_core::model::MindMapState;
use mm_core::mutation::Mutation;

/// Linear undo/redo over mind-map snapshots.
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest first.
    past: Vec<MindMapState>,
    present: MindMapState,
    /// Nearest last, so redo pops from the end.
    future: Vec<MindMapState>,
    /// Maximum undo depth; `None` is unbounded.
    max_depth: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MindMapState::default())
    }
}

impl History {
    /// Start a history whose present is `initial` and whose stacks are empty.
    pub fn new(initial: MindMapState) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            max_depth: None,
        }
    }

    /// Cap the number of undo steps kept. The oldest entries are trimmed first.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self.trim();
        self
    }

    pub fn present(&self) -> &MindMapState {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Apply `mutator` to the present snapshot and record the result.
    ///
    /// Returns `false` (and records nothing) when the result equals the
    /// present. Otherwise the old present moves onto the undo stack and the
    /// redo stack is discarded.
    pub fn commit<F>(&mut self, mutator: F) -> bool
    where
        F: FnOnce(&MindMapState) -> MindMapState,
    {
        let candidate = mutator(&self.present);
        if candidate == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, candidate);
        self.past.push(previous);
        self.trim();
        self.future.clear();
        true
    }

    /// Commit a named mutation.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        let changed = self.commit(|state| mutation.apply(state));
        if changed {
            log::debug!("commit: {} (undo depth {})", mutation.describe(), self.past.len());
        }
        changed
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        true
    }

    /// Step forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    fn trim(&mut self) {
        if let Some(max) = self.max_depth
            && self.past.len() > max
        {
            let excess = self.past.len() - max;
            self.past.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::id::NodeId;
    use mm_core::model::{Node, Shape};
    use pretty_assertions::assert_eq;

    fn node(id: &str, x: f64) -> Node {
        Node {
            id: NodeId::intern(id),
            text: id.into(),
            x,
            y: 0.0,
            width: 50.0,
            height: 30.0,
            shape: Shape::Rectangle,
            color: "#FFFFFF".into(),
        }
    }

    fn add(id: &str, x: f64) -> Mutation {
        Mutation::AddNode {
            node: Box::new(node(id, x)),
        }
    }

    #[test]
    fn commit_then_undo_restores() {
        let mut history = History::default();
        assert!(history.apply(&add("h1", 0.0)));
        assert_eq!(history.present().nodes.len(), 1);
        assert!(history.undo());
        assert_eq!(history.present(), &MindMapState::default());
        assert!(!history.can_undo());
    }

    #[test]
    fn identical_commit_is_dropped() {
        let mut history = History::default();
        assert!(!history.commit(|s| s.clone()));
        assert!(!history.can_undo());
        // Undo with nothing recorded is a no-op.
        assert!(!history.undo());
    }

    #[test]
    fn redo_after_undo() {
        let mut history = History::default();
        history.apply(&add("h2", 0.0));
        let after = history.present().clone();
        history.undo();
        assert!(history.redo());
        assert_eq!(history.present(), &after);
        assert!(!history.redo());
    }

    #[test]
    fn commit_after_undo_clears_redo() {
        let mut history = History::default();
        history.apply(&add("h3", 0.0));
        history.apply(&add("h4", 10.0));
        history.undo();
        history.undo();
        assert_eq!(history.redo_depth(), 2);
        history.apply(&add("h5", 20.0));
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn undo_order_is_lifo() {
        let mut history = History::default();
        history.apply(&add("h6", 0.0));
        history.apply(&Mutation::MoveNode {
            id: NodeId::intern("h6"),
            x: 40.0,
            y: 0.0,
        });
        history.apply(&Mutation::MoveNode {
            id: NodeId::intern("h6"),
            x: 80.0,
            y: 0.0,
        });
        history.undo();
        assert_eq!(history.present().nodes[0].x, 40.0);
        history.undo();
        assert_eq!(history.present().nodes[0].x, 0.0);
        history.redo();
        history.redo();
        assert_eq!(history.present().nodes[0].x, 80.0);
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut history = History::default().with_max_depth(Some(3));
        for i in 0..5 {
            history.apply(&add(&format!("depth{i}"), i as f64));
        }
        let mut undo_count = 0;
        while history.undo() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
        assert_eq!(history.present().nodes.len(), 2);
    }
}
