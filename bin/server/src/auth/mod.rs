//! Authentication module for the wicket server.
//!
//! This module provides:
//! - The auth flow controller routes (login, logout, failure, callback)
//! - The route-guard middleware protecting configured host routes
//! - The challenge and error views
//!
//! # Flow
//!
//! A request to a protected route without an authenticated session is
//! redirected to the login entry point, which either renders the
//! provider-choice challenge or, with a single configured provider,
//! redirects straight into its start endpoint. The provider hands a
//! normalized claim to the callback route; the claim is validated and
//! policy-checked before the session is established and the user is sent
//! back to the URL they originally requested.

pub mod middleware;
pub mod routes;
pub mod views;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use wicket_access::{SessionId, SessionManager};

use crate::config::AuthConfig;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "wicket_session";

pub use middleware::{CurrentUser, route_guard};
pub use routes::{callback, failure, login, logout, provider_start};

/// Shared application state.
pub struct AppState {
    /// Session manager over the configured session store.
    pub sessions: SessionManager,
    /// Resolved authentication configuration.
    pub auth: AuthConfig,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(sessions: SessionManager, auth: AuthConfig) -> Self {
        Self { sessions, auth }
    }
}

/// Returns the request's session id, minting one (and its cookie) when the
/// browser sent none.
///
/// The cookie is scoped to the whole site and lasts for the browser
/// session; durability beyond that is the session store's concern.
pub(crate) fn ensure_session(jar: CookieJar, auth: &AuthConfig) -> (CookieJar, SessionId) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = SessionId::from(cookie.value());
        return (jar, id);
    }

    let id = SessionId::generate();
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .secure(auth.secure_cookies)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

/// Returns the session id the browser presented, if any.
pub(crate) fn existing_session(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE).map(|c| SessionId::from(c.value()))
}
