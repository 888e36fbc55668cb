//! Prompt text and response schemas for each generator call.
//!
//! Every call asks for JSON and pins the shape with a response schema, so
//! the reply parses straight into `Vec<String>` or `Vec<GeneratedTask>`.

use mm_core::model::MindMapState;
use serde_json::{Value, json};
use std::fmt::Write as _;

pub fn brainstorm(topic: &str) -> String {
    format!(
        "Brainstorm a list of 5 to 7 concise, creative ideas or concepts related to \"{topic}\". \
         Present them as a JSON array of strings."
    )
}

pub const EXTRACT_IDEAS: &str = "Extract the key ideas and concepts from this image of handwritten notes. \
     Present them as a JSON array of strings.";

/// Describe the map's nodes and connections as plain text.
pub fn describe_map(state: &MindMapState) -> String {
    let mut out = String::from(
        "Here is a mind map structure. The nodes represent ideas or concepts, \
         and the connectors represent relationships between them.\n\nNodes:\n",
    );
    for node in &state.nodes {
        let _ = writeln!(out, "- Node \"{}\": {}", node.id, node.text);
    }
    out.push_str("\nConnections:\n");
    for c in &state.connectors {
        let _ = writeln!(
            out,
            "- Node \"{}\" is connected to Node \"{}\"",
            c.from_node_id, c.to_node_id
        );
    }
    out
}

pub fn tasks(state: &MindMapState) -> String {
    format!(
        "Based on the following mind map structure, generate a concise list of actionable tasks \
         to bring these ideas to life. Present the tasks as a JSON array of objects, where each \
         object has \"text\" (the task description) and \"completed\" (defaulting to false).\n\n{}",
        describe_map(state)
    )
}

pub fn breakdown(text: &str) -> String {
    format!(
        "Break down the following complex task into 3-5 smaller, actionable sub-tasks. \
         Task: \"{text}\". Present the sub-tasks as a JSON array of objects, where each object \
         has \"text\" (the sub-task description) and \"completed\" (defaulting to false)."
    )
}

/// Schema for a JSON array of strings.
pub fn string_list_schema(item_description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING", "description": item_description }
    })
}

/// Schema for a JSON array of `{ text, completed }` objects.
pub fn task_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": { "type": "STRING", "description": "The actionable task description." },
                "completed": { "type": "BOOLEAN", "description": "Whether the task is completed." }
            },
            "required": ["text", "completed"]
        }
    })
}
