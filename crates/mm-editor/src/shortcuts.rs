//! Canvas keyboard bindings.
//!
//! Hosts forward raw `KeyboardEvent.key` strings; the canvas decides what
//! they mean, so the browser and the tests share one table.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolConnect,

    // ── Edit ──
    Undo,
    Redo,
    /// Delete the selected node.
    Delete,

    // ── UI ──
    /// Leave connecting mode and drop the selection.
    Cancel,
}

/// Key table for the canvas. `ctrl` and `meta` (⌘) are interchangeable.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Action bound to `key` under `modifiers`, if any.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        // Alt combinations are left to the host.
        if modifiers.alt {
            return None;
        }

        match key {
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "c" | "C" => Some(ShortcutAction::ToolConnect),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
