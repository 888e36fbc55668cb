//! Gemini `generateContent` client over blocking HTTP.

use crate::collaborator::Collaborator;
use crate::config::AiConfig;
use crate::error::AiError;
use crate::prompt;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mm_core::model::{GeneratedIdea, GeneratedTask, MindMapState};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Text of the first candidate, all parts concatenated.
fn candidate_text(response: &GenerateResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Decode a raw `generateContent` reply into `T`.
fn parse_reply<T: DeserializeOwned>(body: &str) -> Result<T, AiError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = candidate_text(&response).ok_or(AiError::EmptyResponse)?;
    Ok(serde_json::from_str(text.trim())?)
}

// ─── Client ──────────────────────────────────────────────────────────────

pub struct GeminiClient {
    http: Client,
    config: AiConfig,
    credential: String,
}

impl GeminiClient {
    pub fn new(credential: impl Into<String>, config: AiConfig) -> Result<Self, AiError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            credential: credential.into(),
        })
    }

    fn generate<T: DeserializeOwned>(&self, parts: Vec<Part>, schema: Value) -> Result<T, AiError> {
        let request = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };
        let response = self
            .http
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.credential)
            .json(&request)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status(status.as_u16()));
        }
        parse_reply(&response.text()?)
    }

    fn ideas(&self, parts: Vec<Part>, item: &str) -> Result<Vec<GeneratedIdea>, AiError> {
        let texts: Vec<String> = self.generate(parts, prompt::string_list_schema(item))?;
        Ok(texts.into_iter().map(|text| GeneratedIdea { text }).collect())
    }
}

impl Collaborator for GeminiClient {
    fn generate_ideas(&self, topic: &str) -> Result<Vec<GeneratedIdea>, AiError> {
        self.ideas(
            vec![Part::text(prompt::brainstorm(topic))],
            "A single brainstormed idea.",
        )
    }

    fn extract_ideas(&self, image: &[u8], mime_type: &str) -> Result<Vec<GeneratedIdea>, AiError> {
        let image_part = Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: STANDARD.encode(image),
            }),
        };
        self.ideas(
            vec![Part::text(prompt::EXTRACT_IDEAS), image_part],
            "A single extracted idea.",
        )
    }

    fn generate_tasks(&self, state: &MindMapState) -> Result<Vec<GeneratedTask>, AiError> {
        self.generate(
            vec![Part::text(prompt::tasks(state))],
            prompt::task_list_schema(),
        )
    }

    fn breakdown_task(&self, text: &str) -> Result<Vec<GeneratedTask>, AiError> {
        self.generate(
            vec![Part::text(prompt::breakdown(text))],
            prompt::task_list_schema(),
        )
    }
}
