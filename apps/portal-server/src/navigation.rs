//! Navigation controller.
//!
//! State-mutating handlers return [`RerenderRequested`] instead of drawing
//! anything themselves; the page is drawn only by the portal view.

use axum::response::{IntoResponse, Redirect, Response};
use entities::Category;

use crate::error::{ServerError, ServerResult};
use crate::session::SessionId;
use crate::state::AppState;

/// Signal that session state changed and the page must be drawn again.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerenderRequested;

impl IntoResponse for RerenderRequested {
    fn into_response(self) -> Response {
        Redirect::to("/").into_response()
    }
}

/// Makes `category_id` the session's active category.
pub async fn select_category(
    state: &AppState,
    session: SessionId,
    category_id: &str,
) -> ServerResult<RerenderRequested> {
    let category = Category::find(category_id)
        .ok_or_else(|| ServerError::InvalidRequest(format!("Unknown category: {category_id}")))?;

    state
        .update_session(session, |context| context.active_category = category)
        .await?;

    tracing::info!(session_id = %session.0, category_id = %category.id, "Category selected");
    Ok(RerenderRequested)
}
