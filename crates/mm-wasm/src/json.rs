//! JSON views of editor state handed to the JavaScript side.

use mm_core::model::MindMapState;
use mm_core::persist::KeyValueStore;
use mm_editor::{App, Interaction, RequestKind};
use serde_json::{Value, json};

pub fn ok(mut payload: Value) -> String {
    if let Value::Object(map) = &mut payload {
        map.insert("ok".into(), Value::Bool(true));
    }
    payload.to_string()
}

pub fn error(message: &str) -> String {
    json!({ "ok": false, "error": message }).to_string()
}

pub fn state(state: &MindMapState) -> String {
    serde_json::to_string(state).unwrap_or_else(|e| error(&format!("Serialization error: {e}")))
}

fn interaction(interaction: &Interaction) -> Value {
    match interaction {
        Interaction::Idle => json!({ "mode": "idle" }),
        Interaction::Panning => json!({ "mode": "panning" }),
        Interaction::DraggingNode { id, .. } => json!({ "mode": "dragging", "node": id }),
        Interaction::Connecting { source } => json!({ "mode": "connecting", "node": source }),
        Interaction::EditingText { id, buffer } => {
            json!({ "mode": "editing", "node": id, "buffer": buffer })
        }
    }
}

/// Everything the chrome around the canvas needs to render.
pub fn ui<S: KeyValueStore>(app: &App<S>) -> Value {
    let canvas = app.canvas();
    let view = canvas.view();
    json!({
        "tool": canvas.tool().as_str(),
        "selected": canvas.selected(),
        "contextMenu": canvas.context_menu().map(|m| json!({ "node": m.node, "x": m.x, "y": m.y })),
        "interaction": interaction(canvas.interaction()),
        "view": { "panX": view.pan_x, "panY": view.pan_y, "scale": view.scale },
        "canUndo": canvas.can_undo(),
        "canRedo": canvas.can_redo(),
        "ideasPanelOpen": app.ideas_panel_open(),
        "tasksPanelOpen": app.tasks_panel_open(),
        "loading": {
            "ideas": app.is_loading(RequestKind::Ideas) || app.is_loading(RequestKind::ImageIdeas),
            "tasks": app.is_loading(RequestKind::Tasks),
        },
        "hasCredential": app.credential().is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::config::CanvasConfig;
    use mm_core::id::NodeId;
    use mm_core::model::Idea;
    use mm_core::persist::InMemoryStore;
    use mm_editor::InputEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok_and_error_envelopes() {
        assert_eq!(ok(json!({ "csv": "a" })), r#"{"csv":"a","ok":true}"#);
        assert_eq!(error("nope"), r#"{"error":"nope","ok":false}"#);
    }

    #[test]
    fn ui_reports_editing_buffer() {
        let mut app = App::new(InMemoryStore::new(), CanvasConfig::default());
        app.handle(&InputEvent::Drop {
            idea: Idea {
                id: NodeId::intern("wasm_n1"),
                text: "Hello".into(),
            },
            x: 100.0,
            y: 100.0,
        });
        app.handle(&InputEvent::DoubleClick { x: 100.0, y: 100.0 });

        let ui = ui(&app);
        assert_eq!(ui["interaction"]["mode"], "editing");
        assert_eq!(ui["interaction"]["node"], "wasm_n1");
        assert_eq!(ui["interaction"]["buffer"], "Hello");
        assert_eq!(ui["canUndo"], true);
        assert_eq!(ui["contextMenu"], Value::Null);
        assert_eq!(ui["tool"], "select");
    }
}
