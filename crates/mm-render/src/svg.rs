//! SVG export of a mind-map snapshot.
//!
//! The document is cropped to the node bounding box plus padding.
//! Connectors are drawn in their own group beneath the node group and share
//! a single arrowhead marker.

use mm_core::model::{MindMapState, Node, Shape};
use std::fmt::Write as _;
use thiserror::Error;

const STROKE: &str = "#6b7280";
const TEXT_FILL: &str = "#374151";
const STROKE_WIDTH: f64 = 2.0;
const CORNER_RADIUS: f64 = 12.0;
const MARKER_ID: &str = "arrowhead-export";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("Canvas is empty. Add some nodes to export.")]
    EmptyCanvas,
}

/// Render `state` as a standalone SVG document.
///
/// # Errors
/// Returns [`ExportError::EmptyCanvas`] when there are no nodes.
pub fn render_svg(state: &MindMapState, padding: f64) -> Result<String, ExportError> {
    let Some(first) = state.nodes.first() else {
        return Err(ExportError::EmptyCanvas);
    };

    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = first.max();
    for node in &state.nodes[1..] {
        let (nx, ny) = node.max();
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(nx);
        max_y = max_y.max(ny);
    }

    let width = max_x - min_x + padding * 2.0;
    let height = max_y - min_y + padding * 2.0;
    let offset = (padding - min_x, padding - min_y);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    svg.push_str("  <defs>\n");
    let _ = writeln!(
        svg,
        "    <marker id=\"{MARKER_ID}\" viewBox=\"0 0 10 10\" refX=\"9\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\">"
    );
    let _ = writeln!(svg, "      <path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{STROKE}\" />");
    svg.push_str("    </marker>\n  </defs>\n");

    svg.push_str("  <g class=\"connectors\">\n");
    for conn in &state.connectors {
        let (Some(from), Some(to)) = (state.node(conn.from_node_id), state.node(conn.to_node_id)) else {
            continue;
        };
        let (x1, y1) = from.center();
        let (x2, y2) = to.center();
        let _ = writeln!(
            svg,
            "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{STROKE}\" stroke-width=\"{STROKE_WIDTH}\" marker-end=\"url(#{MARKER_ID})\" />",
            x1 + offset.0,
            y1 + offset.1,
            x2 + offset.0,
            y2 + offset.1,
        );
    }
    svg.push_str("  </g>\n");

    svg.push_str("  <g class=\"nodes\">\n");
    for node in &state.nodes {
        render_node(&mut svg, node, offset);
    }
    svg.push_str("  </g>\n</svg>\n");

    log::debug!(
        "Exported {} nodes and {} connectors to SVG ({width}×{height})",
        state.nodes.len(),
        state.connectors.len()
    );
    Ok(svg)
}

fn render_node(out: &mut String, node: &Node, offset: (f64, f64)) {
    let x = node.x + offset.0;
    let y = node.y + offset.1;
    let cx = x + node.width / 2.0;
    let cy = y + node.height / 2.0;
    let fill = escape_xml(&node.color);

    match node.shape {
        Shape::Rectangle => {
            let _ = writeln!(
                out,
                "    <rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" rx=\"{CORNER_RADIUS}\" fill=\"{fill}\" stroke=\"{STROKE}\" stroke-width=\"{STROKE_WIDTH}\" />",
                node.width, node.height
            );
        }
        Shape::Ellipse => {
            let _ = writeln!(
                out,
                "    <ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\" stroke=\"{STROKE}\" stroke-width=\"{STROKE_WIDTH}\" />",
                node.width / 2.0,
                node.height / 2.0
            );
        }
        Shape::Diamond => {
            let _ = writeln!(
                out,
                "    <rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" rx=\"0\" fill=\"{fill}\" stroke=\"{STROKE}\" stroke-width=\"{STROKE_WIDTH}\" transform=\"rotate(45, {cx}, {cy})\" />",
                node.width, node.height
            );
        }
    }

    let lines: Vec<&str> = node.text.lines().collect();
    // Centre the block of lines vertically on the node.
    let lead = match lines.len() {
        0 | 1 => 0.0,
        n => -0.6 * (n - 1) as f64,
    };
    let _ = write!(
        out,
        "    <text x=\"{cx}\" y=\"{cy}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"sans-serif\" font-size=\"14\" font-weight=\"500\" fill=\"{TEXT_FILL}\">"
    );
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { lead } else { 1.2 };
        let _ = write!(out, "<tspan x=\"{cx}\" dy=\"{dy}em\">{}</tspan>", escape_xml(line));
    }
    out.push_str("</text>\n");
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::id::{ConnectorId, NodeId};
    use mm_core::model::Connector;

    fn node(id: &str, text: &str, x: f64, y: f64, shape: Shape) -> Node {
        Node {
            id: NodeId::intern(id),
            text: text.into(),
            x,
            y,
            width: 100.0,
            height: 40.0,
            shape,
            color: "#FFFFFF".into(),
        }
    }

    #[test]
    fn empty_canvas_is_an_error() {
        assert_eq!(
            render_svg(&MindMapState::default(), 50.0),
            Err(ExportError::EmptyCanvas)
        );
    }

    #[test]
    fn document_is_cropped_to_content() {
        let state = MindMapState {
            nodes: vec![
                node("s1", "A", -100.0, 20.0, Shape::Rectangle),
                node("s2", "B", 200.0, 220.0, Shape::Ellipse),
            ],
            connectors: vec![],
        };
        let svg = render_svg(&state, 50.0).unwrap();
        // 400 wide content + 100 padding; 240 tall content + 100 padding.
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"500\" height=\"340\" viewBox=\"0 0 500 340\">"
        ));
        // First node translated to the padding corner.
        assert!(svg.contains("<rect x=\"50\" y=\"50\" width=\"100\" height=\"40\" rx=\"12\""));
        assert!(svg.contains("<ellipse cx=\"400\" cy=\"270\" rx=\"50\" ry=\"20\""));
    }

    #[test]
    fn connectors_render_beneath_nodes() {
        let state = MindMapState {
            nodes: vec![
                node("s3", "A", 0.0, 0.0, Shape::Rectangle),
                node("s4", "B", 200.0, 0.0, Shape::Diamond),
            ],
            connectors: vec![Connector {
                id: ConnectorId::intern("s3-s4"),
                from_node_id: NodeId::intern("s3"),
                to_node_id: NodeId::intern("s4"),
            }],
        };
        let svg = render_svg(&state, 50.0).unwrap();
        let line = svg.find("<line x1=\"100\" y1=\"70\" x2=\"300\" y2=\"70\"").unwrap();
        let first_shape = svg.find("<rect x=").unwrap();
        assert!(line < first_shape);
        assert_eq!(svg.matches("<marker ").count(), 1);
        assert!(svg.contains("transform=\"rotate(45, 300, 70)\""));
    }

    #[test]
    fn labels_are_escaped() {
        let state = MindMapState {
            nodes: vec![node("s5", "R&D <fast> \"now\" 'ok'", 0.0, 0.0, Shape::Rectangle)],
            connectors: vec![],
        };
        let svg = render_svg(&state, 10.0).unwrap();
        assert!(svg.contains("R&amp;D &lt;fast&gt; &quot;now&quot; &#039;ok&#039;"));
        assert!(!svg.contains("<fast>"));
    }
}
