//! RI2MAPS Portal Server
//!
//! A bulletin-board portal: a category menu, a per-category item list with
//! search, registration of documents, links and videos, and deletion. Items
//! live in Cloud Firestore and uploaded files in Cloud Storage.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod navigation;
pub mod render;
pub mod session;
pub mod state;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::gateway::PortalGateway;
use crate::state::{AppState, create_shared_state};

/// Creates the application router with all routes configured.
pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    api::create_router(state.clone())
        .with_state(state)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state, connecting the gateway to the configured
/// backend.
pub fn create_state(config: Config) -> Arc<AppState> {
    let gateway = PortalGateway::connect(&config);
    create_shared_state(config, gateway)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
