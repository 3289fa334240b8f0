//! Protected-route matching and redirect targeting.
//!
//! The guard decides, per request path, whether authentication is required.
//! Patterns are glob-style: an exact path, or a prefix followed by `/*`
//! meaning everything nested under the prefix (but not the prefix itself).
//! Routes that match no pattern pass through unconditionally, whatever the
//! authentication state.

use serde::{Deserialize, Serialize};

/// One protected-route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePattern(String);

impl RoutePattern {
    /// Creates a pattern from its textual form.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Returns the textual form of the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the request path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self.0.strip_suffix("/*") {
            Some(prefix) => path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1),
            None => path == self.0,
        }
    }
}

impl From<&str> for RoutePattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordered set of protected-route patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtectedRoutes {
    patterns: Vec<RoutePattern>,
}

impl ProtectedRoutes {
    /// Creates a set from explicit patterns.
    #[must_use]
    pub fn new(patterns: Vec<RoutePattern>) -> Self {
        Self { patterns }
    }

    /// Creates the default set covering the host's write operations.
    #[must_use]
    pub fn write_operations() -> Self {
        [
            "/revert/*", "/revert", "/create/*", "/create", "/edit/*", "/edit", "/rename/*",
            "/rename", "/rename/", "/upload/*", "/upload", "/upload/", "/delete/*", "/delete",
        ]
        .into_iter()
        .map(RoutePattern::new)
        .collect()
    }

    /// Returns true if the path matches any pattern.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// Returns the patterns in order.
    #[must_use]
    pub fn patterns(&self) -> &[RoutePattern] {
        &self.patterns
    }
}

impl Default for ProtectedRoutes {
    fn default() -> Self {
        Self::write_operations()
    }
}

impl FromIterator<RoutePattern> for ProtectedRoutes {
    fn from_iter<I: IntoIterator<Item = RoutePattern>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Picks the redirect target for logout and for re-visits to the login
/// entry point while already authenticated.
///
/// Kicks back to the referrer unless its path points back under the auth
/// route prefix, which would loop; then (or with no referrer at all) the
/// target is `/`. Only the path component is examined, so a query string
/// that merely mentions the prefix does not trip the loop guard.
#[must_use]
pub fn kick_back_target(referrer: Option<&str>, route_prefix: &str) -> String {
    match referrer {
        Some(r) if !r.is_empty() && !under_prefix(referrer_path(r), route_prefix) => r.to_string(),
        _ => "/".to_string(),
    }
}

/// Extracts the path component of a referrer, which may be an absolute URL
/// or a bare path.
fn referrer_path(referrer: &str) -> &str {
    let path = match referrer.find("://") {
        Some(scheme) => {
            let rest = &referrer[scheme + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "/",
            }
        }
        None => referrer,
    };
    path.split(['?', '#']).next().unwrap_or(path)
}

fn under_prefix(path: &str, route_prefix: &str) -> bool {
    path == route_prefix
        || path
            .strip_prefix(route_prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
