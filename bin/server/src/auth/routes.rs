//! Auth flow controller routes: login, logout, failure, and callback.
//!
//! Every expected rejection inside the callback path is caught here and
//! rendered as an error view with a title and subtext; nothing propagates
//! to a generic fault handler, and the origin URL survives every error
//! path so retry is seamless.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use wicket_access::{
    AuthFlowError, AuthenticatedUser, CommitAuthor, RawClaim, SessionId, kick_back_target,
    resolve_logo, validate,
};

use super::{AppState, ensure_session, existing_session, middleware::referrer, views};

/// Query parameters carried through the challenge and provider round trip.
#[derive(Debug, Deserialize)]
pub struct OriginQuery {
    origin: Option<String>,
}

/// Query parameters of the provider failure callback.
#[derive(Debug, Deserialize)]
pub struct FailureQuery {
    message: Option<String>,
    origin: Option<String>,
}

/// Login entry point.
///
/// Already-authenticated visitors are kicked back to where they came from.
/// Otherwise the origin is captured (explicit `origin` parameter, then the
/// referrer, then `/`) and either the single configured provider is
/// entered directly or the provider-choice challenge is rendered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<OriginQuery>,
    jar: CookieJar,
) -> Response {
    let (jar, session_id) = ensure_session(jar, &state.auth);

    if state.sessions.is_authenticated(&session_id).await {
        return kick_back(&state, &headers);
    }

    let origin = query
        .origin
        .or_else(|| referrer(&headers))
        .unwrap_or_else(|| "/".to_string());
    state
        .sessions
        .set_origin(&session_id, origin.clone())
        .await;

    // Single provider: skip the choice screen entirely.
    if let Some(provider) = state.auth.registry.single() {
        let target = format!(
            "{}?origin={}",
            provider.start_path(),
            urlencoding::encode(&origin)
        );
        return (jar, Redirect::to(&target)).into_response();
    }

    let choices = provider_choices(&state, &origin);
    (
        jar,
        Html(views::login_page(
            "Authentication is required",
            "Please choose a login service",
            &choices,
        )),
    )
        .into_response()
}

/// Logout. Clears the session user and kicks back; never fails.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    if let Some(session_id) = existing_session(&jar) {
        state.sessions.clear(&session_id).await;
        tracing::info!(session = %session_id, "session user cleared on logout");
    }
    kick_back(&state, &headers)
}

/// Provider failure callback.
///
/// The provider reported that it could not validate the user's
/// credentials; any session user is cleared and the error view is shown
/// with the origin preserved for retry.
pub async fn failure(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FailureQuery>,
    jar: CookieJar,
) -> Response {
    if let Some(session_id) = existing_session(&jar) {
        state.sessions.clear(&session_id).await;
    }

    let message = query.message.unwrap_or_else(|| "unknown".to_string());
    rejection(
        &state,
        &AuthFlowError::ProviderFailure { message },
        query.origin.as_deref(),
    )
}

/// Provider callback: drives validation, authorization, and establishment.
///
/// The provider integration attaches the normalized claim as a request
/// extension. In dummy mode the configured fixed claim is injected
/// instead. A missing claim while unauthenticated is treated as a
/// provider failure.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<OriginQuery>,
    claim: Option<Extension<RawClaim>>,
    jar: CookieJar,
) -> Response {
    let (jar, session_id) = ensure_session(jar, &state.auth);

    let (claim, dummy) = match claim {
        Some(Extension(claim)) => (claim, false),
        None if state.auth.dummy => (state.auth.dummy_claim(), true),
        None => {
            if state.sessions.is_authenticated(&session_id).await {
                // Already signed in; nothing to process, return to origin.
                let target = state.sessions.take_origin(&session_id).await;
                return (jar, Redirect::to(&target)).into_response();
            }
            tracing::warn!(provider = %provider_id, "callback arrived without a claim");
            return (
                jar,
                rejection(
                    &state,
                    &AuthFlowError::ProviderFailure {
                        message: "provider returned no identity".to_string(),
                    },
                    query.origin.as_deref(),
                ),
            )
                .into_response();
        }
    };

    complete(&state, jar, &session_id, claim, dummy, query.origin).await
}

/// Provider start passthrough.
///
/// In dummy mode this runs the fixed claim through the same pipeline as a
/// real callback. Otherwise the provider integration must have consumed
/// the request before it reached here, so any direct hit is a 404.
pub async fn provider_start(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<OriginQuery>,
    jar: CookieJar,
) -> Response {
    if !state.auth.dummy {
        let err = AuthFlowError::NotFound;
        return (StatusCode::NOT_FOUND, err.subtext()).into_response();
    }

    tracing::debug!(provider = %provider_id, "dummy mode handling provider start");
    let (jar, session_id) = ensure_session(jar, &state.auth);
    complete(
        &state,
        jar,
        &session_id,
        state.auth.dummy_claim(),
        true,
        query.origin,
    )
    .await
}

/// Runs a claim through validation and authorization, then establishes the
/// session and redirects to the consumed origin.
async fn complete(
    state: &AppState,
    jar: CookieJar,
    session_id: &SessionId,
    claim: RawClaim,
    dummy: bool,
    origin_param: Option<String>,
) -> Response {
    let profile = match validate(&claim, &state.auth.defaults) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::info!(provider = %claim.provider, error = %e, "claim rejected by validator");
            return (jar, rejection(state, &e.into(), origin_param.as_deref())).into_response();
        }
    };

    let user = if dummy {
        AuthenticatedUser::Dummy(profile)
    } else {
        AuthenticatedUser::Provider(profile)
    };

    // Authorization runs before any session write; a denied identity must
    // never reach the store.
    if !state.auth.policy.is_authorized(&user) {
        tracing::info!(
            provider = %user.provider_id(),
            subject = %user.id(),
            "validated identity denied by authorization policy"
        );
        return (
            jar,
            rejection(state, &AuthFlowError::AuthorizationDenied, origin_param.as_deref()),
        )
            .into_response();
    }

    let author = CommitAuthor::derive(&user, state.auth.author_format);
    tracing::info!(
        provider = %user.provider_id(),
        subject = %user.id(),
        name = %user.display_name(),
        "session established"
    );
    state.sessions.establish(session_id, user, author).await;

    let stored = state.sessions.take_origin(session_id).await;
    let target = origin_param.unwrap_or(stored);
    (jar, Redirect::to(&target)).into_response()
}

/// Renders a rejection outcome as the error view, preserving the origin on
/// the retry link.
fn rejection(state: &AppState, err: &AuthFlowError, origin: Option<&str>) -> Response {
    let retry = match origin {
        Some(origin) => format!(
            "{}?origin={}",
            state.auth.login_path(),
            urlencoding::encode(origin)
        ),
        None => state.auth.login_path(),
    };
    Html(views::error_page(err.title(), &err.subtext(), &retry)).into_response()
}

/// Redirect used by logout and authenticated login revisits.
fn kick_back(state: &AppState, headers: &HeaderMap) -> Response {
    let target = kick_back_target(referrer(headers).as_deref(), &state.auth.route_prefix);
    Redirect::to(&target).into_response()
}

/// Builds the challenge-screen entries with resolved logos.
fn provider_choices(state: &AppState, origin: &str) -> Vec<views::ProviderChoice> {
    state
        .auth
        .registry
        .providers()
        .iter()
        .map(|provider| {
            let logo_href = resolve_logo(
                &state.auth.images_dir,
                provider,
                &state.auth.logo_suffix,
                state.auth.logo_missing.as_deref(),
            )
            .map(|file| format!("{}/images/{file}", state.auth.route_prefix));
            views::ProviderChoice {
                name: provider.display_name(),
                start_href: format!(
                    "{}?origin={}",
                    provider.start_path(),
                    urlencoding::encode(origin)
                ),
                logo_href,
            }
        })
        .collect()
}
