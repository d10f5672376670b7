use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{model} adapter failed: {reason}")]
    Adapter { model: String, reason: String },

    #[error("{model} adapter timed out after {timeout_ms}ms")]
    Timeout { model: String, timeout_ms: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("entity extraction failed: {0}")]
    Entities(String),
}
