//! Validation error types.

use thiserror::Error;

/// Errors raised when a record fails validation before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    #[error("Title is required")]
    MissingTitle,

    /// Category ID does not name a known category.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A URL field was present but blank.
    #[error("{0} must not be blank when present")]
    BlankUrl(&'static str),

    /// An external link was supplied for a category that does not take links.
    #[error("Category {0} does not accept external links")]
    LinkNotAccepted(String),

    /// An item ID contains characters a backend-assigned ID never has.
    #[error("Invalid item ID: {0:?}")]
    InvalidItemId(String),
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
