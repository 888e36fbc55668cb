//! Generator configuration and credential lookup.

use mm_core::persist::{self, KeyValueStore};
use std::time::Duration;

/// Environment variable consulted when the store holds no credential.
pub const CREDENTIAL_ENV: &str = "API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub model: String,
    /// Base URL of the generative language API, without a trailing slash.
    pub endpoint: String,
    /// Whole-request timeout. A request that exceeds it yields no data.
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl AiConfig {
    /// Full `generateContent` URL for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// The credential from `store`, falling back to the `API_KEY` environment
/// variable.
pub fn resolve_credential(store: &dyn KeyValueStore) -> Option<String> {
    pick_credential(
        persist::load_credential(store),
        std::env::var(CREDENTIAL_ENV).ok(),
    )
}

fn pick_credential(stored: Option<String>, env: Option<String>) -> Option<String> {
    stored
        .or(env)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
