//! Error types for the wicket-access crate.
//!
//! Expected rejections are values, not faults:
//! - `ValidationError`: an identity claim failed validation
//! - `AuthFlowError`: the authentication flow ended in a rejection
//!
//! The flow controller matches these exhaustively and renders them as
//! user-facing error views; none of them propagate to a generic fault
//! handler.

use std::fmt;

/// Errors from validating a raw identity claim.
///
/// A claim comes from a remote provider and is untrusted; any field may be
/// missing, empty, or whitespace. Each variant names the field that could
/// not be resolved after the documented fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The subject identifier was missing or empty after trimming.
    MissingSubjectId,
    /// No display name could be resolved from name, handle, or the
    /// configured default.
    MissingDisplayName,
    /// No email could be resolved from the claim or the configured default.
    MissingEmail,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSubjectId => {
                write!(
                    f,
                    "insufficient data from authentication provider, subject id not provided or empty"
                )
            }
            Self::MissingDisplayName => {
                write!(
                    f,
                    "insufficient data from authentication provider, name not provided or empty"
                )
            }
            Self::MissingEmail => {
                write!(
                    f,
                    "insufficient data from authentication provider, email not provided or empty"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Rejection outcomes of the authentication flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFlowError {
    /// The provider's claim failed validation.
    Validation(ValidationError),
    /// The provider signaled failure, or handed back no claim at all.
    ProviderFailure { message: String },
    /// The identity validated but is not in the authorized set.
    AuthorizationDenied,
    /// A provider start path was requested without the provider middleware
    /// handling it first.
    NotFound,
}

impl AuthFlowError {
    /// Title line shown on the error view.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::ProviderFailure { .. } => "Authentication failed",
            Self::AuthorizationDenied => "Authorization failed",
            Self::NotFound => "Not found",
        }
    }

    /// Subtext line shown on the error view.
    #[must_use]
    pub fn subtext(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::ProviderFailure { message } => {
                format!(
                    "Provider did not validate your credentials ({message}) - please retry or choose another login service"
                )
            }
            Self::AuthorizationDenied => {
                "User was not found in the authorized users list".to_string()
            }
            Self::NotFound => "No such authentication resource".to_string(),
        }
    }
}

impl fmt::Display for AuthFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "claim validation failed: {e}"),
            Self::ProviderFailure { message } => {
                write!(f, "provider failure: {message}")
            }
            Self::AuthorizationDenied => write!(f, "identity is not authorized"),
            Self::NotFound => write!(f, "unhandled provider start path"),
        }
    }
}

impl std::error::Error for AuthFlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for AuthFlowError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_missing_field() {
        assert!(
            ValidationError::MissingSubjectId
                .to_string()
                .contains("subject id")
        );
        assert!(
            ValidationError::MissingDisplayName
                .to_string()
                .contains("name")
        );
        assert!(ValidationError::MissingEmail.to_string().contains("email"));
    }

    #[test]
    fn provider_failure_subtext_carries_the_message() {
        let err = AuthFlowError::ProviderFailure {
            message: "invalid_credentials".to_string(),
        };
        assert_eq!(err.title(), "Authentication failed");
        assert!(err.subtext().contains("invalid_credentials"));
        assert!(err.subtext().contains("did not validate"));
    }

    #[test]
    fn authorization_denied_has_distinct_title() {
        let err = AuthFlowError::AuthorizationDenied;
        assert_eq!(err.title(), "Authorization failed");
        assert!(err.subtext().contains("authorized users list"));
    }

    #[test]
    fn validation_error_converts_into_flow_error() {
        let err: AuthFlowError = ValidationError::MissingEmail.into();
        assert_eq!(err.title(), "Authentication failed");
        assert!(err.subtext().contains("email"));
    }
}
