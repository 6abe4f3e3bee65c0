use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to callers of the intelligence service
#[derive(Error, Debug)]
pub enum IntelligenceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, IntelligenceError>;

/// Why a text model call produced no text.
///
/// These never reach callers of the orchestrators; they are logged and the
/// deterministic fallback is used instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl ModelError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::Timeout(_) => "timeout",
            ModelError::Transport(_) => "transport",
            ModelError::Rejected { .. } => "rejected",
            ModelError::Malformed(_) => "malformed",
        }
    }
}
