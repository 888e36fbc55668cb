pub mod config;
pub mod id;
pub mod lint;
pub mod measure;
pub mod model;
pub mod mutation;
pub mod persist;
pub mod task;
pub mod viewport;

pub use config::CanvasConfig;
pub use id::{ConnectorId, NodeId};
pub use lint::{LintDiagnostic, LintSeverity, lint_snapshot};
pub use measure::{TextMeasure, TextMetrics};
pub use model::*;
pub use mutation::Mutation;
pub use persist::{InMemoryStore, KeyValueStore, PersistError};
pub use task::{Task, TaskList, TaskPatch};
pub use viewport::{Origin, ViewTransform};
