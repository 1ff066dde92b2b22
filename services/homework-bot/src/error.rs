//! Error types for the homework bot

use crate::homework::HomeworkError;
use crate::response::ResponseError;

/// Errors that can occur in the homework bot
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API response: {0}")]
    Response(#[from] ResponseError),

    #[error("Invalid homework record: {0}")]
    Homework(#[from] HomeworkError),

    #[error("Notifier error: {0}")]
    Notifier(String),
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
