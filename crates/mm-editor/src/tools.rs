//! Tool context for canvas interactions.
//!
//! The active tool gates how clicks on nodes are interpreted:
//!
//! | Tool | Click on node | Pointer-down on node |
//! |------|---------------|----------------------|
//! | **Select** | select it | start dragging it |
//! | **Connect** | pick source, then target | ignored |

/// The active tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolKind {
    #[default]
    Select,
    Connect,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Connect => "connect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Self::Select),
            "connect" => Some(Self::Connect),
            _ => None,
        }
    }
}
