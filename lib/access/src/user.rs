//! Authenticated user types.
//!
//! An `AuthenticatedUser` exists only after a raw provider claim has passed
//! validation; nothing else constructs one. It lives attached to a session
//! and is destroyed with it.

use serde::{Deserialize, Serialize};

/// A fully validated identity.
///
/// Fields are private: the only way to obtain a profile is through the
/// claim validator, so a profile is either complete or never observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-namespace-unique subject identifier.
    id: String,
    /// Resolved display name (claim name, handle, or configured default).
    display_name: String,
    /// Resolved email (claim email or configured default).
    email: String,
    /// Short provider-given alias, when the provider supplies one.
    handle: Option<String>,
    /// Which provider authenticated this identity.
    provider_id: String,
}

impl UserProfile {
    /// Assembles a profile from already-validated parts.
    ///
    /// Only the claim validator (and tests) should call this; all inputs
    /// must be non-empty and trimmed.
    #[must_use]
    pub(crate) fn new(
        id: String,
        display_name: String,
        email: String,
        handle: Option<String>,
        provider_id: String,
    ) -> Self {
        Self {
            id,
            display_name,
            email,
            handle,
            provider_id,
        }
    }

    /// Returns the subject identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resolved display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the resolved email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the provider-given alias, if any.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// Returns the identifier of the provider that authenticated this user.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }
}

/// A validated identity bound to one session.
///
/// The `Dummy` variant marks identities injected by the dummy/test-mode
/// configuration path. Dummy claims pass through the same validator and
/// authorization filter as provider claims; the tag only records how the
/// claim entered the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "profile", rename_all = "lowercase")]
pub enum AuthenticatedUser {
    /// Identity validated from an external provider's claim.
    Provider(UserProfile),
    /// Identity validated from the configured dummy claim.
    Dummy(UserProfile),
}

impl AuthenticatedUser {
    /// Returns the underlying profile.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        match self {
            Self::Provider(p) | Self::Dummy(p) => p,
        }
    }

    /// Returns the subject identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.profile().id()
    }

    /// Returns the resolved display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.profile().display_name()
    }

    /// Returns the resolved email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.profile().email()
    }

    /// Returns the provider-given alias, if any.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        self.profile().handle()
    }

    /// Returns the identifier of the authenticating provider.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        self.profile().provider_id()
    }

    /// Returns true for identities injected by dummy/test mode.
    #[must_use]
    pub fn is_dummy(&self) -> bool {
        matches!(self, Self::Dummy(_))
    }
}
