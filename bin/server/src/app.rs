//! Router assembly.

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::auth::{self, AppState};
use crate::pages;

/// Builds the full application router: the gatekeeper routes under the
/// configured prefix, the provider-logo static route, and the host surface
/// wrapped in the route-guard layer.
pub fn router(state: Arc<AppState>) -> Router {
    let prefix = state.auth.route_prefix.clone();

    Router::new()
        .route(&format!("{prefix}/login"), get(auth::login))
        .route(&format!("{prefix}/logout"), get(auth::logout))
        .route(&format!("{prefix}/auth/failure"), get(auth::failure))
        .route(
            &format!("{prefix}/auth/{{provider}}/callback"),
            get(auth::callback),
        )
        .route(
            &format!("{prefix}/auth/{{provider}}"),
            get(auth::provider_start),
        )
        .nest_service(
            &format!("{prefix}/images"),
            ServeDir::new(&state.auth.images_dir),
        )
        .route("/favicon.ico", get(pages::favicon))
        .route("/", get(pages::page))
        .route("/{*path}", get(pages::page))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::route_guard,
        ))
        .with_state(state)
}
