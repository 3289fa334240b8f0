//! wicket-server: the authentication gatekeeper wired as an axum service.
//!
//! The library exposes the router and state so integration tests drive the
//! exact service the binary serves.

pub mod app;
pub mod auth;
pub mod config;
pub mod pages;

pub use app::router;
pub use auth::AppState;
pub use config::{AuthConfig, AuthSettings, ServerConfig};
