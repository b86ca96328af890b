//! Server error types.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::gateway::GatewayError;
use crate::render;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session missing from the registry.
    #[error("Session not found")]
    SessionNotFound,

    /// Gateway error.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::SessionNotFound => StatusCode::BAD_REQUEST,
            ServerError::Gateway(GatewayError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Gateway(GatewayError::Validation(_) | GatewayError::DisallowedFile(_)) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Gateway(GatewayError::Store(_)) => StatusCode::BAD_GATEWAY,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (status, Html(render::render_error_page(status, &self.to_string()))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
