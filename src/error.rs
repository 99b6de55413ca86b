//! Error types for the Arcadia SDK.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadiaError {
    /// The remote resource does not exist (HTTP 404).
    #[error("resource not found")]
    NotFound,

    /// The token was rejected or lacks access (HTTP 401/403).
    #[error("authentication rejected (status {status})")]
    Auth { status: u16 },

    /// Input rejected client-side, before any request was made.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Any other non-success response from the network.
    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An expected key was absent from a fetched document.
    #[error("missing field: {field}")]
    MissingField { field: &'static str },
}

impl ArcadiaError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, ArcadiaError>;
