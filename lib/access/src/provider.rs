//! Provider registration and the provider registry.
//!
//! Providers are declared in configuration as a typed list. Each entry has
//! a declared set of recognized keys; anything else a deployment passes
//! along for its provider integration is kept in `extra` and ignored here,
//! with a warning so typos do not vanish silently. The registry derives
//! the per-provider endpoints and display data the challenge screen and
//! the flow controller need.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative registration of one identity provider.
///
/// The gatekeeper interprets only the declared fields; provider-specific
/// arguments (client ids, secrets, scopes, endpoints) ride along in
/// `extra` for the provider integration that performs the actual
/// handshake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier, used in route paths and logo file names.
    pub id: String,
    /// Display name for the challenge screen; defaults to the capitalized id.
    #[serde(default)]
    pub label: Option<String>,
    /// Arguments for the provider integration, not interpreted here.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ProviderConfig {
    /// Creates a registration with only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the display name: the label, or the id with its first
    /// letter capitalized.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => {
                let mut chars = self.id.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
        }
    }
}

/// A registered provider with its derived endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    config: ProviderConfig,
    start_path: String,
    callback_path: String,
}

impl Provider {
    /// Returns the provider identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Returns the display name for the challenge screen.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.config.display_name()
    }

    /// Returns the path that starts this provider's hand-off.
    #[must_use]
    pub fn start_path(&self) -> &str {
        &self.start_path
    }

    /// Returns the path the provider calls back to.
    #[must_use]
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    /// Returns this provider's logo file name for the given suffix.
    #[must_use]
    pub fn logo_file(&self, logo_suffix: &str) -> String {
        format!("{}{logo_suffix}", self.config.id)
    }
}

/// Ordered registry of configured providers.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Builds the registry from the configured registrations.
    ///
    /// Start and callback paths live under `{route_prefix}/auth/{id}`.
    /// Unrecognized registration keys are logged and ignored.
    #[must_use]
    pub fn new(route_prefix: &str, configs: Vec<ProviderConfig>) -> Self {
        let providers = configs
            .into_iter()
            .map(|config| {
                for key in config.extra.keys() {
                    tracing::warn!(
                        provider = %config.id,
                        key = %key,
                        "unrecognized provider registration key, passing through uninterpreted"
                    );
                }
                let start_path = format!("{route_prefix}/auth/{}", config.id);
                let callback_path = format!("{start_path}/callback");
                Provider {
                    config,
                    start_path,
                    callback_path,
                }
            })
            .collect();
        Self { providers }
    }

    /// Returns the providers in registration order.
    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Returns the provider with the given id, if registered.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id() == id)
    }

    /// Returns the sole provider when exactly one is configured.
    ///
    /// The challenge screen is skipped in that case; the flow redirects
    /// straight into this provider's start endpoint.
    #[must_use]
    pub fn single(&self) -> Option<&Provider> {
        match self.providers.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Returns true when no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Resolves the logo to show for a provider.
///
/// Returns the provider's own logo file name if it exists in `images_dir`,
/// else the fallback logo (when configured and present), else `None`.
/// A plain local file-existence check; the image route serves the bytes.
#[must_use]
pub fn resolve_logo(
    images_dir: &Path,
    provider: &Provider,
    logo_suffix: &str,
    fallback: Option<&str>,
) -> Option<String> {
    let own = provider.logo_file(logo_suffix);
    if images_dir.join(&own).is_file() {
        return Some(own);
    }
    let fallback = format!("{}{logo_suffix}", fallback?);
    images_dir.join(&fallback).is_file().then_some(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[&str]) -> ProviderRegistry {
        ProviderRegistry::new(
            "/__wicket__",
            ids.iter().map(|id| ProviderConfig::new(*id)).collect(),
        )
    }

    #[test]
    fn registry_derives_start_and_callback_paths() {
        let registry = registry(&["github"]);
        let provider = registry.get("github").expect("registered");
        assert_eq!(provider.start_path(), "/__wicket__/auth/github");
        assert_eq!(provider.callback_path(), "/__wicket__/auth/github/callback");
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = registry(&["github", "gitlab"]);
        let ids: Vec<_> = registry.providers().iter().map(Provider::id).collect();
        assert_eq!(ids, ["github", "gitlab"]);
    }

    #[test]
    fn single_only_with_exactly_one_provider() {
        assert!(registry(&[]).single().is_none());
        assert_eq!(
            registry(&["github"]).single().map(Provider::id),
            Some("github")
        );
        assert!(registry(&["github", "gitlab"]).single().is_none());
    }

    #[test]
    fn display_name_defaults_to_capitalized_id() {
        assert_eq!(ProviderConfig::new("github").display_name(), "Github");
        assert_eq!(
            ProviderConfig::new("github")
                .with_label("GitHub")
                .display_name(),
            "GitHub"
        );
    }

    #[test]
    fn extra_keys_survive_deserialization() {
        let config: ProviderConfig = serde_json::from_str(
            r#"{"id": "github", "client_id": "abc", "client_secret": "xyz"}"#,
        )
        .expect("parse");
        assert_eq!(config.id, "github");
        assert_eq!(config.extra.len(), 2);
        assert_eq!(
            config.extra.get("client_id"),
            Some(&Value::String("abc".to_string()))
        );
    }

    #[test]
    fn logo_resolution_prefers_the_provider_logo() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("github_logo.png"), b"png").expect("write");
        std::fs::write(dir.path().join("fallback_logo.png"), b"png").expect("write");

        let registry = registry(&["github"]);
        let provider = registry.get("github").expect("registered");
        assert_eq!(
            resolve_logo(dir.path(), provider, "_logo.png", Some("fallback")),
            Some("github_logo.png".to_string())
        );
    }

    #[test]
    fn logo_resolution_falls_back_then_gives_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("fallback_logo.png"), b"png").expect("write");

        let registry = registry(&["gitlab"]);
        let provider = registry.get("gitlab").expect("registered");

        assert_eq!(
            resolve_logo(dir.path(), provider, "_logo.png", Some("fallback")),
            Some("fallback_logo.png".to_string())
        );
        assert_eq!(resolve_logo(dir.path(), provider, "_logo.png", None), None);

        let empty = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            resolve_logo(empty.path(), provider, "_logo.png", Some("fallback")),
            None
        );
    }
}
