//! Error types for the compute-service client.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the compute service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (includes connect errors and the fixed
    /// request timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Service answered with a non-success HTTP status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request exceeded its bounded wait.
    #[error("request timed out: {0}")]
    Timeout(String),
}

impl ClientError {
    /// Check whether this failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Timeout(_) => true,
            ClientError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
