//! Authentication and authorization core for the wicket gatekeeper.
//!
//! This crate provides:
//! - Identity-claim validation (`RawClaim` → `UserProfile`)
//! - The authenticated-user type (`AuthenticatedUser`)
//! - Authorization policy (`AccessPolicy`)
//! - Session management (`SessionManager`, `SessionStore`)
//! - Protected-route matching (`ProtectedRoutes`)
//! - Provider registration (`ProviderRegistry`)
//!
//! # Trust Model
//!
//! Everything a provider hands back is untrusted until it passes
//! [`claim::validate`]; an [`AuthenticatedUser`] can only exist after
//! validation succeeded in full. Authorization runs on the validated
//! identity before anything touches the session store.
//!
//! # Example
//!
//! ```
//! use wicket_access::claim::{validate, IdentityDefaults, RawClaim};
//! use wicket_access::policy::AccessPolicy;
//! use wicket_access::user::AuthenticatedUser;
//!
//! let claim = RawClaim::new("42", "github")
//!     .with_name("Ann")
//!     .with_email("ann@x.com");
//!
//! let profile = validate(&claim, &IdentityDefaults::default()).expect("valid claim");
//! let user = AuthenticatedUser::Provider(profile);
//!
//! assert!(AccessPolicy::AllowAll.is_authorized(&user));
//! assert_eq!(user.display_name(), "Ann");
//! ```

pub mod author;
pub mod claim;
pub mod error;
pub mod guard;
pub mod policy;
pub mod provider;
pub mod session;
pub mod user;

// Re-export main types at crate root
pub use author::{AuthorFormat, CommitAuthor};
pub use claim::{ClaimInfo, IdentityDefaults, RawClaim, validate};
pub use error::{AuthFlowError, ValidationError};
pub use guard::{ProtectedRoutes, RoutePattern, kick_back_target};
pub use policy::AccessPolicy;
pub use provider::{Provider, ProviderConfig, ProviderRegistry, resolve_logo};
pub use session::{MemorySessionStore, SessionData, SessionId, SessionManager, SessionStore};
pub use user::{AuthenticatedUser, UserProfile};
