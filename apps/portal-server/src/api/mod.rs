//! HTTP endpoints.

pub mod items;
pub mod portal;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::session::session_middleware;
use crate::state::SharedState;

/// Creates the router with all endpoints.
///
/// Portal routes run behind the session middleware; `/health` does not.
pub fn create_router(state: SharedState) -> Router<SharedState> {
    let portal = Router::new()
        .route("/", get(portal::show_portal))
        .route("/navigate", post(portal::navigate))
        .route("/items", post(items::register_item))
        .route("/items/delete", post(items::delete_item))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            session_middleware,
        ));

    Router::new()
        .merge(portal)
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
