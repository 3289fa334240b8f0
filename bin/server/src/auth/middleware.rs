//! Route-guard middleware and extractors for Axum.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use wicket_access::AuthenticatedUser;

use super::{AppState, ensure_session, existing_session};

/// Intercepts requests to protected routes.
///
/// Paths outside the configured pattern set pass through for everyone;
/// protected-route status, not auth status, gates entry. A protected
/// request without an authenticated session captures the requested path as
/// the origin and redirects to the login entry point.
///
/// Browsers fetch `/favicon.ico` on their own, which would otherwise
/// consume referrer-based redirect tracking; unauthenticated favicon
/// requests are rejected outright instead.
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let authed = match existing_session(&jar) {
        Some(id) => state.sessions.is_authenticated(&id).await,
        None => false,
    };

    if path == "/favicon.ico" && !authed {
        return StatusCode::FORBIDDEN.into_response();
    }

    if state.auth.protected.is_protected(&path) && !authed {
        tracing::debug!(path = %path, "challenging unauthenticated request to protected route");
        let (jar, session_id) = ensure_session(jar, &state.auth);
        state.sessions.set_origin(&session_id, path.clone()).await;
        // The origin also rides the redirect so the login entry point
        // re-captures it even if the session cookie gets dropped.
        let target = format!(
            "{}?origin={}",
            state.auth.login_path(),
            urlencoding::encode(&path)
        );
        return (jar, Redirect::to(&target)).into_response();
    }

    next.run(request).await
}

/// Extractor for the session's authenticated user, if any.
///
/// Never rejects; host pages use it to render identity state.
pub struct CurrentUser(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let user = match existing_session(&jar) {
            Some(id) => app_state.sessions.current_user(&id).await,
            None => None,
        };

        Ok(CurrentUser(user))
    }
}

/// Returns the request's referrer, when the header is valid UTF-8.
pub(crate) fn referrer(parts_headers: &axum::http::HeaderMap) -> Option<String> {
    parts_headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
