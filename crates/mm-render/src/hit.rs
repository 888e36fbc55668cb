//! Hit testing: canvas point → node lookup.
//!
//! Walks nodes back-to-front (last painted = topmost) and tests the point
//! against each node's actual outline, not just its bounding box.

use kurbo::{Affine, Ellipse, Point, Rect, Shape as _};
use mm_core::id::NodeId;
use mm_core::model::{MindMapState, Node, Shape};
use std::f64::consts::FRAC_PI_4;

/// Find the topmost node at canvas position `(px, py)`.
/// Returns `None` if no node is hit (background).
pub fn hit_test(state: &MindMapState, px: f64, py: f64) -> Option<NodeId> {
    let pt = Point::new(px, py);
    state
        .nodes
        .iter()
        .rev()
        .find(|node| node_contains(node, pt))
        .map(|node| node.id)
}

/// Whether `pt` lies inside the node's outline.
pub fn node_contains(node: &Node, pt: Point) -> bool {
    let rect = node_rect(node);
    match node.shape {
        Shape::Rectangle => rect.contains(pt),
        Shape::Ellipse => Ellipse::from_rect(rect).contains(pt),
        Shape::Diamond => {
            // Undo the 45° rotation, then test against the upright box.
            let unrotate = Affine::rotate_about(-FRAC_PI_4, rect.center());
            rect.contains(unrotate * pt)
        }
    }
}

pub fn node_rect(node: &Node) -> Rect {
    Rect::new(node.x, node.y, node.x + node.width, node.y + node.height)
}
