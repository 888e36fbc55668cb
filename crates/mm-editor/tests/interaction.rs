//! Integration tests: raw input events through the interaction state machine.
//!
//! Each test replays the event sequence a browser would deliver and checks
//! the committed snapshot, the history depth and the resulting mode.

use mm_core::config::CanvasConfig;
use mm_core::id::NodeId;
use mm_core::measure::{TextMeasure, TextMetrics};
use mm_core::model::Idea;
use mm_core::persist::{InMemoryStore, SNAPSHOT_KEY, decode_snapshot};
use mm_core::viewport::Origin;
use mm_editor::{App, InputEvent, Interaction, MindMapCanvas, Modifiers, ToolKind};
use pretty_assertions::assert_eq;

fn make_canvas() -> MindMapCanvas {
    let state = decode_snapshot(include_str!("fixtures/two_nodes.json")).unwrap();
    MindMapCanvas::new(state, CanvasConfig::default())
}

fn click(canvas: &mut MindMapCanvas, x: f64, y: f64) {
    canvas.handle(&InputEvent::PointerDown { x, y });
    canvas.handle(&InputEvent::PointerUp { x, y });
    canvas.handle(&InputEvent::Click { x, y });
}

// Screen points inside the fixture nodes (identity view).
const ALPHA: (f64, f64) = (50.0, 25.0);
const BETA: (f64, f64) = (350.0, 25.0);
const EMPTY: (f64, f64) = (200.0, 400.0);

// ─── Dropping ideas ─────────────────────────────────────────────────────

#[test]
fn drop_idea_centres_measured_node() {
    let mut canvas = MindMapCanvas::default();
    let outcome = canvas.handle(&InputEvent::Drop {
        idea: Idea {
            id: NodeId::intern("i1"),
            text: "Launch".into(),
        },
        x: 100.0,
        y: 100.0,
    });
    assert!(outcome.snapshot_changed);

    let size = TextMetrics::default().measure("Launch");
    let node = &canvas.present().nodes[0];
    assert_eq!(node.id, NodeId::intern("i1"));
    assert!((node.x - (100.0 - size.width / 2.0)).abs() < 1e-9);
    assert!((node.y - (100.0 - size.height / 2.0)).abs() < 1e-9);
    assert_eq!((node.width, node.height), (size.width, size.height));
    assert_eq!(canvas.history().undo_depth(), 1);
}

#[test]
fn drop_respects_pan_zoom_and_origin() {
    let mut canvas = MindMapCanvas::default();
    canvas.set_origin(Origin { x: 20.0, y: 10.0 });
    // Pan by dragging empty canvas.
    canvas.handle(&InputEvent::PointerDown { x: 500.0, y: 500.0 });
    canvas.handle(&InputEvent::PointerMove {
        x: 540.0,
        y: 530.0,
        dx: 40.0,
        dy: 30.0,
    });
    canvas.handle(&InputEvent::PointerUp { x: 540.0, y: 530.0 });

    canvas.handle(&InputEvent::Drop {
        idea: Idea {
            id: NodeId::intern("panned"),
            text: "Panned".into(),
        },
        x: 160.0,
        y: 140.0,
    });
    let (cx, cy) = canvas.present().nodes[0].center();
    assert!((cx - 100.0).abs() < 1e-9);
    assert!((cy - 100.0).abs() < 1e-9);
}

// ─── Connect tool ───────────────────────────────────────────────────────

#[test]
fn connect_tool_links_two_nodes_and_reverts() {
    let mut canvas = make_canvas();
    canvas.set_tool(ToolKind::Connect);

    click(&mut canvas, ALPHA.0, ALPHA.1);
    assert_eq!(
        canvas.interaction(),
        &Interaction::Connecting {
            source: NodeId::intern("alpha")
        }
    );
    // Pointer-down on a node with the connect tool never starts a drag.
    assert!(!canvas.can_undo());

    click(&mut canvas, BETA.0, BETA.1);
    let connectors = &canvas.present().connectors;
    assert_eq!(connectors.len(), 1);
    assert_eq!(connectors[0].from_node_id, NodeId::intern("alpha"));
    assert_eq!(connectors[0].to_node_id, NodeId::intern("beta"));
    assert_eq!(canvas.tool(), ToolKind::Select);
    assert_eq!(canvas.interaction(), &Interaction::Idle);
    assert_eq!(canvas.history().undo_depth(), 1);
}

#[test]
fn connecting_node_to_itself_commits_nothing() {
    let mut canvas = make_canvas();
    canvas.set_tool(ToolKind::Connect);
    click(&mut canvas, ALPHA.0, ALPHA.1);
    click(&mut canvas, ALPHA.0, ALPHA.1);
    assert!(canvas.present().connectors.is_empty());
    assert!(!canvas.can_undo());
    assert_eq!(canvas.tool(), ToolKind::Select);
}

#[test]
fn empty_canvas_press_resets_pending_source() {
    let mut canvas = make_canvas();
    canvas.set_tool(ToolKind::Connect);
    click(&mut canvas, ALPHA.0, ALPHA.1);
    canvas.handle(&InputEvent::PointerDown {
        x: EMPTY.0,
        y: EMPTY.1,
    });
    assert_eq!(canvas.interaction(), &Interaction::Panning);
    canvas.handle(&InputEvent::PointerUp {
        x: EMPTY.0,
        y: EMPTY.1,
    });

    // The next node click picks a new source instead of connecting.
    click(&mut canvas, BETA.0, BETA.1);
    assert!(canvas.present().connectors.is_empty());
    assert_eq!(
        canvas.interaction(),
        &Interaction::Connecting {
            source: NodeId::intern("beta")
        }
    );
    assert_eq!(canvas.tool(), ToolKind::Connect);
}

#[test]
fn escape_cancels_connecting() {
    let mut canvas = make_canvas();
    canvas.handle(&InputEvent::key("c"));
    assert_eq!(canvas.tool(), ToolKind::Connect);
    click(&mut canvas, ALPHA.0, ALPHA.1);
    canvas.handle(&InputEvent::key("Escape"));
    assert_eq!(canvas.interaction(), &Interaction::Idle);
}

#[test]
fn reselecting_connect_keeps_pending_source() {
    let mut canvas = make_canvas();
    canvas.handle(&InputEvent::key("c"));
    click(&mut canvas, ALPHA.0, ALPHA.1);
    canvas.handle(&InputEvent::key("c"));
    assert_eq!(
        canvas.interaction(),
        &Interaction::Connecting {
            source: NodeId::intern("alpha")
        }
    );

    click(&mut canvas, BETA.0, BETA.1);
    assert_eq!(canvas.present().connectors.len(), 1);
    assert_eq!(canvas.tool(), ToolKind::Select);
}

// ─── Text editing ───────────────────────────────────────────────────────

#[test]
fn edit_then_blur_commits_text_and_size() {
    let mut canvas = make_canvas();
    canvas.handle(&InputEvent::DoubleClick {
        x: ALPHA.0,
        y: ALPHA.1,
    });
    assert!(matches!(
        canvas.interaction(),
        Interaction::EditingText { buffer, .. } if buffer == "Alpha"
    ));

    let text = "A much longer label that will need to wrap onto more than one line";
    canvas.handle(&InputEvent::TextInput { text: text.into() });
    let outcome = canvas.handle(&InputEvent::Blur);
    assert!(outcome.snapshot_changed);

    let expected = TextMetrics::default().measure(text);
    let node = canvas.present().node(NodeId::intern("alpha")).unwrap();
    assert_eq!(node.text, text);
    assert_eq!((node.width, node.height), (expected.width, expected.height));
    assert_eq!(canvas.history().undo_depth(), 1);
}

#[test]
fn enter_commits_but_shift_enter_does_not() {
    let mut canvas = make_canvas();
    canvas.handle(&InputEvent::DoubleClick {
        x: BETA.0,
        y: BETA.1,
    });
    canvas.handle(&InputEvent::TextInput {
        text: "Gamma".into(),
    });
    let shift = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    canvas.handle(&InputEvent::key_with("Enter", shift));
    assert!(!canvas.can_undo());

    canvas.handle(&InputEvent::key("Enter"));
    assert_eq!(
        canvas.present().node(NodeId::intern("beta")).unwrap().text,
        "Gamma"
    );
}

#[test]
fn escape_leaves_text_untouched() {
    let mut canvas = make_canvas();
    let before = canvas.present().clone();
    canvas.handle(&InputEvent::DoubleClick {
        x: ALPHA.0,
        y: ALPHA.1,
    });
    canvas.handle(&InputEvent::TextInput {
        text: "Discarded".into(),
    });
    canvas.handle(&InputEvent::key("Escape"));
    assert_eq!(canvas.present(), &before);
    assert!(!canvas.can_undo());
}

#[test]
fn shortcuts_are_ignored_while_editing() {
    let mut canvas = make_canvas();
    canvas.handle(&InputEvent::Click {
        x: ALPHA.0,
        y: ALPHA.1,
    });
    canvas.handle(&InputEvent::DoubleClick {
        x: ALPHA.0,
        y: ALPHA.1,
    });
    // Backspace edits the label, it must not delete the node.
    canvas.handle(&InputEvent::key("Backspace"));
    assert_eq!(canvas.present().nodes.len(), 2);
}

// ─── Drag ───────────────────────────────────────────────────────────────

#[test]
fn drag_then_undo_returns_node() {
    let mut canvas = make_canvas();
    canvas.handle(&InputEvent::PointerDown {
        x: ALPHA.0,
        y: ALPHA.1,
    });
    for step in 1..=10 {
        let x = ALPHA.0 + step as f64 * 5.0;
        canvas.handle(&InputEvent::PointerMove {
            x,
            y: ALPHA.1,
            dx: 5.0,
            dy: 0.0,
        });
    }
    canvas.handle(&InputEvent::PointerUp {
        x: ALPHA.0 + 50.0,
        y: ALPHA.1,
    });
    // Ten moves, one history entry.
    assert_eq!(canvas.history().undo_depth(), 1);
    assert_eq!(canvas.present().node(NodeId::intern("alpha")).unwrap().x, 50.0);

    canvas.handle(&InputEvent::key_with(
        "z",
        Modifiers {
            meta: true,
            ..Modifiers::NONE
        },
    ));
    assert_eq!(canvas.present().node(NodeId::intern("alpha")).unwrap().x, 0.0);
}

#[test]
fn edit_during_drag_ends_the_drag() {
    let mut canvas = make_canvas();
    click(&mut canvas, BETA.0, BETA.1);
    assert_eq!(canvas.selected(), Some(NodeId::intern("beta")));

    canvas.handle(&InputEvent::PointerDown {
        x: ALPHA.0,
        y: ALPHA.1,
    });
    canvas.handle(&InputEvent::PointerMove {
        x: ALPHA.0,
        y: ALPHA.1 + 75.0,
        dx: 0.0,
        dy: 75.0,
    });
    canvas.handle(&InputEvent::key("Delete"));

    assert_eq!(canvas.interaction(), &Interaction::Idle);
    assert_eq!(canvas.displayed(), canvas.present());
    assert!(!canvas.present().contains_node(NodeId::intern("beta")));

    // The rest of the gesture is inert.
    let moved = canvas.handle(&InputEvent::PointerMove {
        x: ALPHA.0,
        y: ALPHA.1 + 100.0,
        dx: 0.0,
        dy: 25.0,
    });
    assert!(!moved.redraw);
    let released = canvas.handle(&InputEvent::PointerUp {
        x: ALPHA.0,
        y: ALPHA.1 + 100.0,
    });
    assert!(!released.snapshot_changed);
    assert_eq!(canvas.present().node(NodeId::intern("alpha")).unwrap().y, 0.0);
    assert_eq!(canvas.history().undo_depth(), 1);
}

#[test]
fn restored_duplicate_ids_keep_drag_on_the_visible_node() {
    let raw = r##"{"nodes":[
        {"id":"dup","text":"A","x":0,"y":0,"width":100,"height":50,"shape":"rectangle","color":"#FFFFFF"},
        {"id":"dup","text":"A2","x":500,"y":0,"width":100,"height":50,"shape":"rectangle","color":"#FFFFFF"}],
        "connectors":[]}"##;
    let mut app = App::new(
        InMemoryStore::new().with_entry(SNAPSHOT_KEY, raw),
        CanvasConfig::default(),
    );
    assert_eq!(app.present().nodes.len(), 1);

    // Where the shadowed copy used to be is now empty canvas.
    app.handle(&InputEvent::PointerDown { x: 550.0, y: 25.0 });
    assert_eq!(app.canvas().interaction(), &Interaction::Panning);
    app.handle(&InputEvent::PointerUp { x: 550.0, y: 25.0 });

    app.handle(&InputEvent::PointerDown { x: 50.0, y: 25.0 });
    app.handle(&InputEvent::PointerMove {
        x: 60.0,
        y: 125.0,
        dx: 10.0,
        dy: 100.0,
    });
    app.handle(&InputEvent::PointerUp { x: 60.0, y: 125.0 });

    let placed: Vec<(&str, f64, f64)> = app
        .present()
        .nodes
        .iter()
        .map(|n| (n.text.as_str(), n.x, n.y))
        .collect();
    assert_eq!(placed, [("A", 10.0, 100.0)]);
}

#[test]
fn out_of_range_zoom_changes_nothing() {
    let mut canvas = make_canvas();
    let mut changed = 0;
    for _ in 0..40 {
        let outcome = canvas.handle(&InputEvent::Wheel {
            x: 10.0,
            y: 10.0,
            delta_y: 100.0,
        });
        if outcome.redraw {
            changed += 1;
        }
    }
    let view = canvas.view();
    assert!(view.scale >= CanvasConfig::default().min_scale);
    // 1.1^-16 ≈ 0.218 is the last step that stays in range.
    assert_eq!(changed, 16);

    let frozen = canvas.view();
    canvas.handle(&InputEvent::Wheel {
        x: 300.0,
        y: 200.0,
        delta_y: 1.0,
    });
    assert_eq!(canvas.view(), frozen);
}
