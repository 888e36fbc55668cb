//! Idea and task generation for the mind-map editor.
//!
//! Everything goes through the [`Collaborator`] trait. [`AiService`] picks
//! a backend (the Gemini HTTP client when a credential is available, the
//! offline [`StandIn`] otherwise) and turns every failure into an empty
//! result, so callers never have to handle generator errors.

pub mod collaborator;
pub mod config;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod service;
pub mod stand_in;

pub use collaborator::Collaborator;
pub use config::{AiConfig, resolve_credential};
pub use error::AiError;
pub use gemini::GeminiClient;
pub use service::AiService;
pub use stand_in::StandIn;
