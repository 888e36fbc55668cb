use thiserror::Error;

/// Why a generator call produced nothing.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator returned HTTP {0}")]
    Status(u16),

    #[error("generator returned no candidate text")]
    EmptyResponse,

    #[error("generator returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
