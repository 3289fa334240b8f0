//! Commit-attribution projections.
//!
//! The host application attributes write actions to a name and email taken
//! from the session. Both are derived from the authenticated user once, at
//! establish time, by pure projections selected in configuration.

use serde::{Deserialize, Serialize};

use crate::user::AuthenticatedUser;

/// How the attribution name is rendered from a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorFormat {
    /// `Display Name (handle)` when a handle exists, else the display name.
    #[default]
    NameWithHandle,
    /// The display name alone.
    NameOnly,
}

impl AuthorFormat {
    /// Renders the attribution name for a user.
    #[must_use]
    pub fn render(&self, user: &AuthenticatedUser) -> String {
        match self {
            Self::NameWithHandle => match user.handle() {
                Some(handle) => format!("{} ({handle})", user.display_name()),
                None => user.display_name().to_string(),
            },
            Self::NameOnly => user.display_name().to_string(),
        }
    }
}

/// Attribution fields stored on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    /// Rendered attribution name.
    pub name: String,
    /// Attribution email.
    pub email: String,
}

impl CommitAuthor {
    /// Derives attribution fields from a user with the configured format.
    #[must_use]
    pub fn derive(user: &AuthenticatedUser, format: AuthorFormat) -> Self {
        Self {
            name: format.render(user),
            email: user.email().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{IdentityDefaults, RawClaim, validate};

    fn user(handle: Option<&str>) -> AuthenticatedUser {
        let mut claim = RawClaim::new("42", "github")
            .with_name("Ann")
            .with_email("ann@x.com");
        if let Some(h) = handle {
            claim = claim.with_nickname(h);
        }
        AuthenticatedUser::Provider(
            validate(&claim, &IdentityDefaults::default()).expect("valid claim"),
        )
    }

    #[test]
    fn name_with_handle_appends_the_handle() {
        let author = CommitAuthor::derive(&user(Some("annie")), AuthorFormat::NameWithHandle);
        assert_eq!(author.name, "Ann (annie)");
        assert_eq!(author.email, "ann@x.com");
    }

    #[test]
    fn name_with_handle_degrades_without_a_handle() {
        let author = CommitAuthor::derive(&user(None), AuthorFormat::NameWithHandle);
        assert_eq!(author.name, "Ann");
    }

    #[test]
    fn name_only_ignores_the_handle() {
        let author = CommitAuthor::derive(&user(Some("annie")), AuthorFormat::NameOnly);
        assert_eq!(author.name, "Ann");
    }
}
