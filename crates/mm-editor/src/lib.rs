pub mod app;
pub mod canvas;
pub mod history;
pub mod input;
pub mod requests;
pub mod shortcuts;
pub mod tools;

pub use app::App;
pub use canvas::{ContextMenu, EventOutcome, Interaction, MindMapCanvas};
pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use requests::{RequestFence, RequestKind, Ticket};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolKind;
