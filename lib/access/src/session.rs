//! Session state for the authentication flow.
//!
//! A session holds at most one authenticated user plus transient
//! navigation state: the origin URL the user was trying to reach before
//! being challenged, and the commit-attribution fields derived at
//! establish time. Session state is owned here; the flow controller only
//! reads and writes through the `SessionManager`.
//!
//! The store itself is a collaborator: anything that can map a session id
//! to `SessionData`. The bundled `MemorySessionStore` keeps state for
//! process lifetime, which matches the gatekeeper's no-persistence model.
//! Each browser session is only touched by its own sequential request
//! flow, so the store needs no coordination beyond its own interior lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::author::CommitAuthor;
use crate::user::AuthenticatedUser;

/// Opaque identifier for one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// The authenticated user, if any.
    user: Option<AuthenticatedUser>,
    /// Attribution fields derived from the user at establish time.
    author: Option<CommitAuthor>,
    /// URL the user was trying to reach before being challenged.
    origin: Option<String>,
    /// When the current user was established.
    established_at: Option<DateTime<Utc>>,
}

/// Maps session identifiers to session state.
///
/// Implementations are expected to provide whatever durability and
/// encryption the deployment needs; the gatekeeper treats the store as an
/// opaque key-value collaborator.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the state for a session, if any exists.
    async fn load(&self, id: &SessionId) -> Option<SessionData>;
    /// Stores the state for a session, replacing any previous value.
    async fn save(&self, id: &SessionId, data: SessionData);
    /// Removes all state for a session.
    async fn delete(&self, id: &SessionId);
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionData>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Option<SessionData> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn save(&self, id: &SessionId, data: SessionData) {
        self.sessions.write().await.insert(id.clone(), data);
    }

    async fn delete(&self, id: &SessionId) {
        self.sessions.write().await.remove(id);
    }
}

/// Read/write surface over a session store.
///
/// All flow-controller access to session state goes through this type.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Creates a manager over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Creates a manager over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Returns true iff the session holds an authenticated user.
    pub async fn is_authenticated(&self, id: &SessionId) -> bool {
        self.store
            .load(id)
            .await
            .is_some_and(|data| data.user.is_some())
    }

    /// Returns the session's authenticated user, if any.
    pub async fn current_user(&self, id: &SessionId) -> Option<AuthenticatedUser> {
        self.store.load(id).await.and_then(|data| data.user)
    }

    /// Returns the attribution fields stored at establish time, if any.
    pub async fn commit_author(&self, id: &SessionId) -> Option<CommitAuthor> {
        self.store.load(id).await.and_then(|data| data.author)
    }

    /// Binds a validated, authorized user to the session, overwriting any
    /// previous user.
    pub async fn establish(&self, id: &SessionId, user: AuthenticatedUser, author: CommitAuthor) {
        let mut data = self.store.load(id).await.unwrap_or_default();
        data.user = Some(user);
        data.author = Some(author);
        data.established_at = Some(Utc::now());
        self.store.save(id, data).await;
    }

    /// Removes the session's user (logout). Idempotent; origin survives.
    pub async fn clear(&self, id: &SessionId) {
        if let Some(mut data) = self.store.load(id).await {
            data.user = None;
            data.author = None;
            data.established_at = None;
            self.store.save(id, data).await;
        }
    }

    /// Removes all state for the session.
    pub async fn destroy(&self, id: &SessionId) {
        self.store.delete(id).await;
    }

    /// Records the URL to return to after authentication.
    pub async fn set_origin(&self, id: &SessionId, url: String) {
        let mut data = self.store.load(id).await.unwrap_or_default();
        data.origin = Some(url);
        self.store.save(id, data).await;
    }

    /// Consumes the stored origin.
    ///
    /// Reads and clears in one step so a captured origin is used exactly
    /// once; a second call returns the default `/`.
    pub async fn take_origin(&self, id: &SessionId) -> String {
        let mut data = self.store.load(id).await.unwrap_or_default();
        let origin = data.origin.take();
        self.store.save(id, data).await;
        origin.unwrap_or_else(|| "/".to_string())
    }
}
