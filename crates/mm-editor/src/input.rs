//! Input abstraction layer.
//!
//! Normalizes browser/host pointer, wheel, keyboard and drag-and-drop events
//! into a unified `InputEvent` enum consumed by the canvas. All coordinates
//! are screen space; the canvas maps them to canvas space itself.

use mm_core::model::Idea;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown { x: f64, y: f64 },

    /// Pointer moved. `dx`/`dy` is the screen-space movement since the last event.
    PointerMove { x: f64, y: f64, dx: f64, dy: f64 },

    /// Primary button released (anywhere, including outside the canvas).
    PointerUp { x: f64, y: f64 },

    /// Press and release without leaving the target.
    Click { x: f64, y: f64 },

    DoubleClick { x: f64, y: f64 },

    /// Secondary button (right click / long press).
    ContextMenu { x: f64, y: f64 },

    /// Wheel notch. Positive `delta_y` scrolls down (zooms out).
    Wheel { x: f64, y: f64, delta_y: f64 },

    /// Keyboard key, using `KeyboardEvent.key` names ("z", "Enter", "Escape").
    Key { key: String, modifiers: Modifiers },

    /// The inline label editor's content changed.
    TextInput { text: String },

    /// The inline label editor lost focus.
    Blur,

    /// An idea dragged from the idea panel was dropped on the canvas.
    Drop { idea: Idea, x: f64, y: f64 },
}

impl InputEvent {
    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key_with(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract screen position if this is a positional event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::Click { x, y }
            | Self::DoubleClick { x, y }
            | Self::ContextMenu { x, y }
            | Self::Wheel { x, y, .. }
            | Self::Drop { x, y, .. } => Some((*x, *y)),
            Self::Key { .. } | Self::TextInput { .. } | Self::Blur => None,
        }
    }
}
