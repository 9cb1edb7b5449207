//! Error types shared by the CMS client, the feed paginator and the generator

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid feed cursor: {0}")]
    InvalidCursor(String),

    #[error("Malformed content in {document}: {reason}")]
    MalformedContent { document: String, reason: String },

    #[error("No {kind} found with uid {uid:?}")]
    NotFound { kind: String, uid: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BlogError {
    pub(crate) fn malformed(document: impl Into<String>, reason: impl Into<String>) -> Self {
        BlogError::MalformedContent {
            document: document.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
