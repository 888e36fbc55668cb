//! Lint diagnostics for mind-map snapshots.
//!
//! Reports structural problems without modifying the snapshot. Used when a
//! stored snapshot is restored, where anything we did not write ourselves
//! may show up.

use crate::measure::TextMeasure;
use crate::model::{MindMapState, Node};
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks a snapshot invariant.
    Warning,
    /// Harmless but unusual.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// Id of the node or connector concerned.
    pub subject: String,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-connector").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the snapshot and return diagnostics.
#[must_use]
pub fn lint_snapshot(state: &MindMapState) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_nodes(state, &mut diags);
    lint_degenerate_sizes(state, &mut diags);
    lint_connectors(state, &mut diags);
    lint_blank_text(state, &mut diags);
    diags
}

/// Bring a restored snapshot back within the model's invariants.
///
/// The first node with a given id wins. Nodes with a non-positive or
/// non-finite size are re-measured from their text. Self-loops, repeated
/// `from → to` edges and connectors to missing nodes are dropped.
#[must_use]
pub fn repair_snapshot(state: &MindMapState, measure: &dyn TextMeasure) -> MindMapState {
    let mut seen = HashSet::new();
    let nodes: Vec<Node> = state
        .nodes
        .iter()
        .filter(|n| seen.insert(n.id))
        .map(|n| {
            let mut node = n.clone();
            if !(node.width.is_finite() && node.height.is_finite())
                || node.width <= 0.0
                || node.height <= 0.0
            {
                let size = measure.measure(&node.text);
                node.width = size.width;
                node.height = size.height;
            }
            node
        })
        .collect();

    let mut pairs = HashSet::new();
    let connectors = state
        .connectors
        .iter()
        .filter(|c| {
            c.from_node_id != c.to_node_id
                && seen.contains(&c.from_node_id)
                && seen.contains(&c.to_node_id)
                && pairs.insert((c.from_node_id, c.to_node_id))
        })
        .cloned()
        .collect();

    MindMapState { nodes, connectors }
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_duplicate_nodes(state: &MindMapState, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for node in &state.nodes {
        if !seen.insert(node.id) {
            diags.push(LintDiagnostic {
                subject: node.id.to_string(),
                message: format!("Node id `{}` appears more than once.", node.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-node",
            });
        }
    }
}

fn lint_degenerate_sizes(state: &MindMapState, diags: &mut Vec<LintDiagnostic>) {
    for node in &state.nodes {
        if !(node.width > 0.0 && node.height > 0.0) {
            diags.push(LintDiagnostic {
                subject: node.id.to_string(),
                message: format!(
                    "Node `{}` has a non-positive size {}×{}.",
                    node.id, node.width, node.height
                ),
                severity: LintSeverity::Warning,
                rule: "degenerate-size",
            });
        }
    }
}

fn lint_connectors(state: &MindMapState, diags: &mut Vec<LintDiagnostic>) {
    let mut pairs = HashSet::new();
    for c in &state.connectors {
        if c.from_node_id == c.to_node_id {
            diags.push(LintDiagnostic {
                subject: c.id.to_string(),
                message: format!("Connector `{}` links node `{}` to itself.", c.id, c.from_node_id),
                severity: LintSeverity::Warning,
                rule: "self-loop",
            });
        }
        if !pairs.insert((c.from_node_id, c.to_node_id)) {
            diags.push(LintDiagnostic {
                subject: c.id.to_string(),
                message: format!(
                    "Connector `{}` duplicates an existing `{}` → `{}` edge.",
                    c.id, c.from_node_id, c.to_node_id
                ),
                severity: LintSeverity::Warning,
                rule: "duplicate-connector",
            });
        }
        for end in [c.from_node_id, c.to_node_id] {
            if !state.contains_node(end) {
                diags.push(LintDiagnostic {
                    subject: c.id.to_string(),
                    message: format!("Connector `{}` references missing node `{end}`.", c.id),
                    severity: LintSeverity::Warning,
                    rule: "dangling-connector",
                });
            }
        }
    }
}

fn lint_blank_text(state: &MindMapState, diags: &mut Vec<LintDiagnostic>) {
    for node in &state.nodes {
        if node.text.trim().is_empty() {
            diags.push(LintDiagnostic {
                subject: node.id.to_string(),
                message: format!("Node `{}` has no label.", node.id),
                severity: LintSeverity::Info,
                rule: "blank-text",
            });
        }
    }
}
