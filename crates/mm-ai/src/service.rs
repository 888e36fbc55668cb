//! Error-swallowing façade over a [`Collaborator`].
//!
//! Every method returns a plain `Vec`. Backend failures are logged and come
//! back empty; nothing is retried.

use crate::collaborator::Collaborator;
use crate::config::AiConfig;
use crate::gemini::GeminiClient;
use crate::stand_in::StandIn;
use mm_core::model::{GeneratedIdea, GeneratedTask, MindMapState};

pub struct AiService {
    backend: Box<dyn Collaborator>,
}

impl AiService {
    pub fn new(backend: Box<dyn Collaborator>) -> Self {
        Self { backend }
    }

    /// Use Gemini when `credential` is present, the offline stand-in otherwise.
    pub fn from_credential(credential: Option<&str>, config: AiConfig) -> Self {
        let Some(credential) = credential.filter(|c| !c.trim().is_empty()) else {
            log::info!("No API key configured, using offline stand-in generator");
            return Self::new(Box::new(StandIn));
        };
        match GeminiClient::new(credential, config) {
            Ok(client) => Self::new(Box::new(client)),
            Err(e) => {
                log::warn!("Could not build HTTP client, using offline stand-in: {e}");
                Self::new(Box::new(StandIn))
            }
        }
    }

    /// Brainstorm ideas for `topic`. Blank topics return nothing.
    pub fn generate_ideas(&self, topic: &str) -> Vec<GeneratedIdea> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Vec::new();
        }
        self.backend
            .generate_ideas(topic)
            .unwrap_or_else(|e| swallow("brainstorming ideas", e))
    }

    pub fn extract_ideas(&self, image: &[u8], mime_type: &str) -> Vec<GeneratedIdea> {
        self.backend
            .extract_ideas(image, mime_type)
            .unwrap_or_else(|e| swallow("extracting ideas from image", e))
    }

    /// Derive tasks from the map. An empty map returns nothing.
    pub fn generate_tasks(&self, state: &MindMapState) -> Vec<GeneratedTask> {
        if state.nodes.is_empty() {
            return Vec::new();
        }
        self.backend
            .generate_tasks(state)
            .unwrap_or_else(|e| swallow("generating tasks from mind map", e))
    }

    pub fn breakdown_task(&self, text: &str) -> Vec<GeneratedTask> {
        self.backend
            .breakdown_task(text)
            .unwrap_or_else(|e| swallow("breaking down task", e))
    }
}

fn swallow<T>(what: &str, error: crate::error::AiError) -> Vec<T> {
    log::warn!("Error {what}: {error}");
    Vec::new()
}
