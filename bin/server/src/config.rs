//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables, then resolved once at startup into the immutable
//! [`AuthConfig`] the flow controller and route guard share.

use std::path::PathBuf;

use regex::Regex;
use serde::Deserialize;
use wicket_access::{
    AccessPolicy, AuthorFormat, IdentityDefaults, ProtectedRoutes, ProviderConfig,
    ProviderRegistry, RawClaim, RoutePattern,
};

/// Server configuration as loaded from the environment.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthSettings,
}

/// Raw authentication settings, before resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Prefix all gatekeeper routes live under.
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Inject the fixed local identity instead of a real provider.
    /// For local development only.
    #[serde(default)]
    pub dummy: bool,

    /// Registered identity providers, in challenge-screen order.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Protected-route patterns; defaults to the host's write operations.
    #[serde(default)]
    pub protected_routes: Option<Vec<String>>,

    /// Authorized emails or handles. Empty means no list restriction.
    #[serde(default)]
    pub authorized_users: Vec<String>,

    /// Regex over emails; takes precedence over the list when set.
    #[serde(default)]
    pub authorized_pattern: Option<String>,

    /// Display name used when a claim resolves no name.
    #[serde(default)]
    pub default_name: Option<String>,

    /// Email used when a claim resolves no email.
    #[serde(default)]
    pub default_email: Option<String>,

    /// Directory provider logos are served from.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Suffix appended to a provider id to form its logo file name.
    #[serde(default = "default_logo_suffix")]
    pub logo_suffix: String,

    /// Base name of the fallback logo; unset disables missing-logo fallback.
    #[serde(default = "default_logo_missing")]
    pub logo_missing: Option<String>,

    /// How the commit-attribution name is rendered.
    #[serde(default)]
    pub author_format: AuthorFormat,

    /// Whether to set the Secure flag on the session cookie.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_route_prefix() -> String {
    "/__wicket__".to_string()
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("public/images")
}

fn default_logo_suffix() -> String {
    "_logo.png".to_string()
}

fn default_logo_missing() -> Option<String> {
    Some("fallback".to_string())
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            dummy: false,
            providers: Vec::new(),
            protected_routes: None,
            authorized_users: Vec::new(),
            authorized_pattern: None,
            default_name: None,
            default_email: None,
            images_dir: default_images_dir(),
            logo_suffix: default_logo_suffix(),
            logo_missing: default_logo_missing(),
            author_format: AuthorFormat::default(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Immutable, process-lifetime authentication configuration.
///
/// Resolved once at startup; shared read-only by the route guard and the
/// flow controller.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub route_prefix: String,
    pub dummy: bool,
    pub registry: ProviderRegistry,
    pub protected: ProtectedRoutes,
    pub policy: AccessPolicy,
    pub defaults: IdentityDefaults,
    pub images_dir: PathBuf,
    pub logo_suffix: String,
    pub logo_missing: Option<String>,
    pub author_format: AuthorFormat,
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// The path of the login entry point.
    #[must_use]
    pub fn login_path(&self) -> String {
        format!("{}/login", self.route_prefix)
    }

    /// The claim injected when dummy mode is enabled.
    ///
    /// Still subject to the same validation and authorization as any
    /// provider claim.
    #[must_use]
    pub fn dummy_claim(&self) -> RawClaim {
        RawClaim::new("12345", "local")
            .with_name("example user")
            .with_email("user@example.com")
    }
}

impl AuthSettings {
    /// Resolves the raw settings into the immutable `AuthConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error when `authorized_pattern` is not a valid regex.
    pub fn resolve(self) -> Result<AuthConfig, regex::Error> {
        let policy = match &self.authorized_pattern {
            Some(pattern) => AccessPolicy::PatternMatch(Regex::new(pattern)?),
            None if !self.authorized_users.is_empty() => {
                AccessPolicy::AllowList(self.authorized_users.clone())
            }
            None => AccessPolicy::AllowAll,
        };

        let protected = match self.protected_routes {
            Some(patterns) => patterns
                .into_iter()
                .map(RoutePattern::new)
                .collect::<ProtectedRoutes>(),
            None => ProtectedRoutes::write_operations(),
        };

        let registry = ProviderRegistry::new(&self.route_prefix, self.providers);

        Ok(AuthConfig {
            route_prefix: self.route_prefix,
            dummy: self.dummy,
            registry,
            protected,
            policy,
            defaults: IdentityDefaults {
                name: self.default_name,
                email: self.default_email,
            },
            images_dir: self.images_dir,
            logo_suffix: self.logo_suffix,
            logo_missing: self.logo_missing,
            author_format: self.author_format,
            secure_cookies: self.secure_cookies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_have_expected_defaults() {
        let settings = AuthSettings::default();
        assert_eq!(settings.route_prefix, "/__wicket__");
        assert!(!settings.dummy);
        assert_eq!(settings.logo_suffix, "_logo.png");
        assert_eq!(settings.logo_missing.as_deref(), Some("fallback"));
        assert!(settings.secure_cookies);
    }

    #[test]
    fn resolve_defaults_to_allow_all() {
        let config = AuthSettings::default().resolve().expect("resolves");
        assert!(matches!(config.policy, AccessPolicy::AllowAll));
        assert!(config.protected.is_protected("/edit/Home"));
    }

    #[test]
    fn resolve_builds_allow_list_policy() {
        let settings = AuthSettings {
            authorized_users: vec!["ann@x.com".to_string()],
            ..AuthSettings::default()
        };
        let config = settings.resolve().expect("resolves");
        assert!(matches!(config.policy, AccessPolicy::AllowList(_)));
    }

    #[test]
    fn pattern_takes_precedence_over_list() {
        let settings = AuthSettings {
            authorized_users: vec!["ann@x.com".to_string()],
            authorized_pattern: Some(r"@x\.com$".to_string()),
            ..AuthSettings::default()
        };
        let config = settings.resolve().expect("resolves");
        assert!(matches!(config.policy, AccessPolicy::PatternMatch(_)));
    }

    #[test]
    fn invalid_pattern_is_a_resolve_error() {
        let settings = AuthSettings {
            authorized_pattern: Some("(unclosed".to_string()),
            ..AuthSettings::default()
        };
        assert!(settings.resolve().is_err());
    }

    #[test]
    fn explicit_protected_routes_replace_the_default_set() {
        let settings = AuthSettings {
            protected_routes: Some(vec!["/admin/*".to_string()]),
            ..AuthSettings::default()
        };
        let config = settings.resolve().expect("resolves");
        assert!(config.protected.is_protected("/admin/users"));
        assert!(!config.protected.is_protected("/edit/Home"));
    }

    #[test]
    fn dummy_claim_validates_against_no_defaults() {
        let config = AuthSettings::default().resolve().expect("resolves");
        let profile = wicket_access::validate(&config.dummy_claim(), &config.defaults)
            .expect("dummy claim passes the validator");
        assert_eq!(profile.id(), "12345");
        assert_eq!(profile.provider_id(), "local");
    }
}
