//! Raw identity claims and their validation.
//!
//! A `RawClaim` is the normalized hand-off a provider integration produces
//! at callback time. Every field that originates remotely is untrusted:
//! it is coerced to a string and trimmed before any emptiness check, so a
//! numeric uid or a whitespace-only name can never slip through as a
//! seemingly valid identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::user::UserProfile;

/// Untrusted identity data handed back by a provider.
///
/// The shape mirrors the provider hand-off: a subject id, a nested info
/// block with optional name/handle/email, and the locally selected
/// provider identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClaim {
    /// Subject identifier; providers disagree on its JSON type, so any
    /// scalar is accepted and coerced.
    #[serde(default)]
    pub uid: Value,
    /// Nested profile info block.
    #[serde(default)]
    pub info: ClaimInfo,
    /// Provider identifier. Set by the local provider-selection step, not
    /// remote data.
    #[serde(default)]
    pub provider: String,
}

/// Optional profile fields inside a claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimInfo {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub nickname: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
}

impl RawClaim {
    /// Creates a claim with only a uid and provider, for building up in
    /// tests and dummy-mode configuration.
    #[must_use]
    pub fn new(uid: impl Into<Value>, provider: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            info: ClaimInfo::default(),
            provider: provider.into(),
        }
    }

    /// Sets the name field.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Value>) -> Self {
        self.info.name = Some(name.into());
        self
    }

    /// Sets the nickname field.
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<Value>) -> Self {
        self.info.nickname = Some(nickname.into());
        self
    }

    /// Sets the email field.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<Value>) -> Self {
        self.info.email = Some(email.into());
        self
    }
}

/// Configured fallbacks applied when a claim omits name or email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDefaults {
    /// Display name used when the claim carries neither name nor handle.
    pub name: Option<String>,
    /// Email used when the claim carries none.
    pub email: Option<String>,
}

/// Coerces an untrusted JSON scalar to a trimmed string.
///
/// Strings trim; numbers and booleans render; null, arrays, and objects
/// coerce to empty, which the emptiness checks then reject.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn coerce_opt(value: Option<&Value>) -> String {
    value.map(coerce).unwrap_or_default()
}

/// Validates a raw claim into a `UserProfile`.
///
/// Pure function over its inputs: no network, no storage. Either every
/// field resolves and a complete profile is returned, or the first
/// unresolvable field is reported and nothing is constructed.
///
/// Resolution order:
/// - subject id: claim uid, required
/// - handle: claim nickname, optional
/// - display name: claim name, then handle, then `defaults.name`
/// - email: claim email, then `defaults.email`
///
/// # Errors
///
/// Returns the `ValidationError` naming the first field that stayed empty
/// after its fallback chain.
pub fn validate(
    claim: &RawClaim,
    defaults: &IdentityDefaults,
) -> Result<UserProfile, ValidationError> {
    let id = coerce(&claim.uid);
    if id.is_empty() {
        return Err(ValidationError::MissingSubjectId);
    }

    let handle = {
        let h = coerce_opt(claim.info.nickname.as_ref());
        if h.is_empty() { None } else { Some(h) }
    };

    let mut display_name = coerce_opt(claim.info.name.as_ref());
    if display_name.is_empty() {
        display_name = handle.clone().unwrap_or_default();
    }
    if display_name.is_empty() {
        display_name = defaults.name.as_deref().unwrap_or("").trim().to_string();
    }
    if display_name.is_empty() {
        return Err(ValidationError::MissingDisplayName);
    }

    let mut email = coerce_opt(claim.info.email.as_ref());
    if email.is_empty() {
        email = defaults.email.as_deref().unwrap_or("").trim().to_string();
    }
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    // Provider id is chosen locally at the provider-selection step.
    let provider_id = claim.provider.clone();

    Ok(UserProfile::new(
        id,
        display_name,
        email,
        handle,
        provider_id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_defaults() -> IdentityDefaults {
        IdentityDefaults::default()
    }

    #[test]
    fn full_claim_validates() {
        let claim = RawClaim::new("42", "github")
            .with_name("Ann")
            .with_email("ann@x.com");

        let profile = validate(&claim, &no_defaults()).expect("valid claim");
        assert_eq!(profile.id(), "42");
        assert_eq!(profile.display_name(), "Ann");
        assert_eq!(profile.email(), "ann@x.com");
        assert_eq!(profile.provider_id(), "github");
        assert_eq!(profile.handle(), None);
    }

    #[test]
    fn numeric_uid_is_coerced() {
        let claim = RawClaim::new(42, "github")
            .with_name("Ann")
            .with_email("ann@x.com");

        let profile = validate(&claim, &no_defaults()).expect("valid claim");
        assert_eq!(profile.id(), "42");
    }

    #[test]
    fn whitespace_uid_is_missing_subject_id() {
        let claim = RawClaim::new("   ", "github")
            .with_name("Ann")
            .with_email("ann@x.com");

        assert_eq!(
            validate(&claim, &no_defaults()),
            Err(ValidationError::MissingSubjectId)
        );
    }

    #[test]
    fn absent_uid_is_missing_subject_id() {
        let claim: RawClaim = serde_json::from_str(r#"{"provider": "github"}"#).expect("parse");
        assert_eq!(
            validate(&claim, &no_defaults()),
            Err(ValidationError::MissingSubjectId)
        );
    }

    #[test]
    fn name_falls_back_to_nickname() {
        let claim = RawClaim::new("42", "github")
            .with_nickname("annie")
            .with_email("ann@x.com");

        let profile = validate(&claim, &no_defaults()).expect("valid claim");
        assert_eq!(profile.display_name(), "annie");
        assert_eq!(profile.handle(), Some("annie"));
    }

    #[test]
    fn name_falls_back_to_default_after_nickname() {
        let defaults = IdentityDefaults {
            name: Some("Anonymous".to_string()),
            email: None,
        };
        let claim = RawClaim::new("42", "github").with_email("ann@x.com");

        let profile = validate(&claim, &defaults).expect("valid claim");
        assert_eq!(profile.display_name(), "Anonymous");
    }

    #[test]
    fn claim_name_wins_over_nickname_and_default() {
        let defaults = IdentityDefaults {
            name: Some("Anonymous".to_string()),
            email: None,
        };
        let claim = RawClaim::new("42", "github")
            .with_name("  Ann  ")
            .with_nickname("annie")
            .with_email("ann@x.com");

        let profile = validate(&claim, &defaults).expect("valid claim");
        assert_eq!(profile.display_name(), "Ann");
    }

    #[test]
    fn unresolvable_name_is_missing_display_name() {
        let claim = RawClaim::new("42", "github").with_email("ann@x.com");
        assert_eq!(
            validate(&claim, &no_defaults()),
            Err(ValidationError::MissingDisplayName)
        );
    }

    #[test]
    fn whitespace_name_and_nickname_fall_through() {
        let claim = RawClaim::new("42", "github")
            .with_name("   ")
            .with_nickname("  ")
            .with_email("ann@x.com");

        assert_eq!(
            validate(&claim, &no_defaults()),
            Err(ValidationError::MissingDisplayName)
        );
    }

    #[test]
    fn email_falls_back_to_default() {
        let defaults = IdentityDefaults {
            name: None,
            email: Some("wiki@example.org".to_string()),
        };
        let claim = RawClaim::new("42", "github").with_name("Ann");

        let profile = validate(&claim, &defaults).expect("valid claim");
        assert_eq!(profile.email(), "wiki@example.org");
    }

    #[test]
    fn unresolvable_email_is_missing_email() {
        let claim = RawClaim::new("42", "github").with_name("Ann");
        assert_eq!(
            validate(&claim, &no_defaults()),
            Err(ValidationError::MissingEmail)
        );
    }

    #[test]
    fn claim_email_wins_over_default() {
        let defaults = IdentityDefaults {
            name: None,
            email: Some("wiki@example.org".to_string()),
        };
        let claim = RawClaim::new("42", "github")
            .with_name("Ann")
            .with_email(" ann@x.com ");

        let profile = validate(&claim, &defaults).expect("valid claim");
        assert_eq!(profile.email(), "ann@x.com");
    }

    #[test]
    fn claim_parses_from_provider_json() {
        let claim: RawClaim = serde_json::from_str(
            r#"{"uid": "42", "info": {"name": "Ann", "email": "ann@x.com"}, "provider": "github"}"#,
        )
        .expect("parse");

        let profile = validate(&claim, &no_defaults()).expect("valid claim");
        assert_eq!(profile.display_name(), "Ann");
        assert_eq!(profile.email(), "ann@x.com");
    }

    #[test]
    fn object_uid_is_rejected_not_stringified() {
        let claim: RawClaim =
            serde_json::from_str(r#"{"uid": {"nested": 1}, "provider": "github"}"#).expect("parse");
        assert_eq!(
            validate(&claim, &no_defaults()),
            Err(ValidationError::MissingSubjectId)
        );
    }
}
