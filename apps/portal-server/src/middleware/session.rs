//! Session middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::session::{SESSION_COOKIE, SessionId};
use crate::state::AppState;

/// Reads the session ID from the request cookies.
fn requested_session(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<Uuid>().ok())
        .map(SessionId)
}

/// Session middleware.
///
/// This middleware makes sure the caller has a session context, stores its
/// [`SessionId`] in the request extensions, and sets the session cookie when
/// a new ID was minted.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let (session_id, minted) = state.sessions.write().await.ensure(requested_session(&jar));

    request.extensions_mut().insert(session_id);
    let response = next.run(request).await;

    if !minted {
        return response;
    }

    let cookie = Cookie::build((SESSION_COOKIE, session_id.0.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), response).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

    use super::*;

    #[test]
    fn test_requested_session_parses_cookie() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("other=1; {SESSION_COOKIE}={id}")).unwrap(),
        );

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(requested_session(&jar), Some(SessionId(id)));
    }

    #[test]
    fn test_requested_session_ignores_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("portal_session=not-a-uuid"),
        );

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(requested_session(&jar), None);
    }
}
