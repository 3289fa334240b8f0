//! Authorization policy for validated identities.
//!
//! Validation decides whether a claim describes a real identity; the
//! policy decides whether that identity may use the application. The check
//! runs before any session write, so an unauthorized identity never
//! reaches the session store.

use regex::Regex;

use crate::user::AuthenticatedUser;

/// Allow-list policy applied to validated identities.
#[derive(Debug, Clone)]
pub enum AccessPolicy {
    /// Every validated identity is authorized.
    AllowAll,
    /// Authorized iff the identity's email or handle is in the list.
    AllowList(Vec<String>),
    /// Authorized iff the identity's email matches the pattern.
    PatternMatch(Regex),
}

impl AccessPolicy {
    /// Returns true if the identity may use the application.
    #[must_use]
    pub fn is_authorized(&self, user: &AuthenticatedUser) -> bool {
        match self {
            Self::AllowAll => true,
            Self::AllowList(entries) => {
                entries.iter().any(|e| e == user.email())
                    || user.handle().is_some_and(|h| entries.iter().any(|e| e == h))
            }
            Self::PatternMatch(pattern) => pattern.is_match(user.email()),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::AllowAll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{IdentityDefaults, RawClaim, validate};
    use crate::user::AuthenticatedUser;

    fn user(email: &str, handle: Option<&str>) -> AuthenticatedUser {
        let mut claim = RawClaim::new("42", "github")
            .with_name("Ann")
            .with_email(email);
        if let Some(h) = handle {
            claim = claim.with_nickname(h);
        }
        let profile = validate(&claim, &IdentityDefaults::default()).expect("valid claim");
        AuthenticatedUser::Provider(profile)
    }

    #[test]
    fn allow_all_authorizes_everyone() {
        let policy = AccessPolicy::AllowAll;
        assert!(policy.is_authorized(&user("ann@x.com", None)));
    }

    #[test]
    fn allow_list_matches_email() {
        let policy = AccessPolicy::AllowList(vec!["ann@x.com".to_string()]);
        assert!(policy.is_authorized(&user("ann@x.com", None)));
        assert!(!policy.is_authorized(&user("bob@x.com", None)));
    }

    #[test]
    fn allow_list_matches_handle() {
        let policy = AccessPolicy::AllowList(vec!["annie".to_string()]);
        assert!(policy.is_authorized(&user("ann@x.com", Some("annie"))));
        assert!(!policy.is_authorized(&user("ann@x.com", None)));
    }

    #[test]
    fn pattern_matches_email_only() {
        let policy = AccessPolicy::PatternMatch(Regex::new(r"@x\.com$").expect("valid regex"));
        assert!(policy.is_authorized(&user("ann@x.com", None)));
        assert!(!policy.is_authorized(&user("ann@y.com", Some("x.com"))));
    }

    #[test]
    fn default_policy_is_allow_all() {
        assert!(matches!(AccessPolicy::default(), AccessPolicy::AllowAll));
    }
}
