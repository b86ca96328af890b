//! Portal page and category navigation endpoints.

use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::error::ServerResult;
use crate::navigation::{self, RerenderRequested};
use crate::render::{PageView, render_page};
use crate::session::SessionId;
use crate::state::AppState;

/// Query string of the portal page.
#[derive(Debug, Default, Deserialize)]
pub struct PortalQuery {
    /// New title search. Absent keeps the session's current search.
    pub q: Option<String>,
}

/// Navigation form.
#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    /// Category to activate.
    pub category: String,
}

/// Renders the portal for the calling session.
pub async fn show_portal(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Query(query): Query<PortalQuery>,
) -> ServerResult<Html<String>> {
    let (user, category, search_query, notices) = state
        .update_session(session, |context| {
            if let Some(q) = query.q {
                context.search_query = q;
            }
            (
                context.user.clone(),
                context.active_category,
                context.search_query.clone(),
                context.take_notices(),
            )
        })
        .await?;

    let listing = state.gateway.list_items(category.id).await;
    tracing::debug!(
        session_id = %session.0,
        category_id = %category.id,
        items = listing.items.len(),
        "Rendering portal"
    );

    let view = PageView {
        user: &user,
        category,
        search_query: &search_query,
        listing: &listing,
        notices: &notices,
        connection_error: state.gateway.connection_error(),
    };
    Ok(Html(render_page(&view)))
}

/// Switches the session's active category.
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<NavigateForm>,
) -> ServerResult<RerenderRequested> {
    navigation::select_category(&state, session, &form.category).await
}
