//! Minimal host application surface fronted by the route guard.
//!
//! The real host application is a collaborator; these handlers exist so
//! the gatekeeper is wired against something end to end. The catch-all
//! page renders the current identity state, which is what a host would use
//! to attribute write actions.

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::auth::CurrentUser;
use crate::auth::views::html_escape;

/// Catch-all host page showing the current identity state.
pub async fn page(CurrentUser(user): CurrentUser, uri: Uri) -> Html<String> {
    let identity = match &user {
        // The display name and provider id came from a provider claim;
        // they are markup until escaped.
        Some(user) => format!(
            "signed in as {} &lt;{}&gt; via {}",
            html_escape(user.display_name()),
            html_escape(user.email()),
            html_escape(user.provider_id())
        ),
        None => "not signed in".to_string(),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html><body><h1>{}</h1><p>{identity}</p></body></html>\n",
        html_escape(uri.path())
    ))
}

/// Favicon endpoint; unauthenticated fetches never get this far (the
/// route guard rejects them with 403).
pub async fn favicon() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
