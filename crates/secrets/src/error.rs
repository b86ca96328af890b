//! Secret error types

use thiserror::Error;

/// Errors that can occur during secret operations
#[derive(Error, Debug)]
pub enum SecretError {
    /// Secrets store could not be read
    #[error("Secrets store error: {0}")]
    Store(String),

    /// Key file could not be read
    #[error("Key file error: {0}")]
    Io(#[from] std::io::Error),

    /// Secrets file is not valid TOML
    #[error("Invalid secrets file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Key material is not valid JSON
    #[error("Invalid key JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid secret format
    #[error("Invalid secret format: {0}")]
    InvalidFormat(String),
}

/// Result type for secret operations
pub type SecretResult<T> = Result<T, SecretError>;
