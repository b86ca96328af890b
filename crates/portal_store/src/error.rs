//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Token signing or exchange failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document could not be decoded.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A record failed validation before persistence.
    #[error("Validation failed: {0}")]
    Validation(#[from] entities::ValidationError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Creates an API error.
    pub fn api(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            service,
            status,
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Turns a non-success response into [`StoreError::Api`].
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::api(service, status.as_u16(), message))
}
