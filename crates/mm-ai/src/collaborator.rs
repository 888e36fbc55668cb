use crate::error::AiError;
use mm_core::model::{GeneratedIdea, GeneratedTask, MindMapState};

/// A source of brainstormed ideas and actionable tasks.
///
/// Calls block until the backend answers or fails. Implementations never
/// touch editor state; results are plain values for the caller to apply.
pub trait Collaborator {
    /// Ideas related to `topic`.
    fn generate_ideas(&self, topic: &str) -> Result<Vec<GeneratedIdea>, AiError>;

    /// Ideas read off an image (e.g. a photo of handwritten notes).
    fn extract_ideas(&self, image: &[u8], mime_type: &str) -> Result<Vec<GeneratedIdea>, AiError>;

    /// Actionable tasks derived from the nodes and connectors of a map.
    fn generate_tasks(&self, state: &MindMapState) -> Result<Vec<GeneratedTask>, AiError>;

    /// Smaller steps for one task.
    fn breakdown_task(&self, text: &str) -> Result<Vec<GeneratedTask>, AiError>;
}
