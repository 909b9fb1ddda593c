//! Persistent session storage.
//!
//! Holds the three pieces of client-side session state:
//! - Access token
//! - Refresh token
//! - Serialized current-user record
//!
//! All operations are synchronous and fail soft: a corrupt or unreadable
//! backing store reads as empty, and write failures are logged rather than
//! surfaced. Staleness detection is the session controller's job, not the
//! store's.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

use anywork_models::User;

// =============================================================================
// Store Contract
// =============================================================================

/// Synchronous key-value storage for session state.
///
/// `current_user` returns `None` on deserialization failure rather than
/// erroring; malformed stored state must never crash the caller.
pub trait SessionStore: Send + Sync {
    /// Persist both tokens.
    fn set_tokens(&self, access: &str, refresh: &str);

    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Drop the tokens and the cached user. A cleared store must never
    /// present a stale identity.
    fn clear_tokens(&self);

    /// Persist the current user record.
    fn set_current_user(&self, user: &User);

    fn current_user(&self) -> Option<User>;
}

/// Serialized form shared by both store implementations.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Current user as a JSON string, parsed lazily so a bad record
    /// degrades to "no user" instead of poisoning the whole store.
    #[serde(default)]
    user: Option<String>,
}

impl StoredSession {
    fn parse_user(&self) -> Option<User> {
        self.user
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    fn store_user(&mut self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.user = Some(raw),
            Err(e) => warn!("Failed to serialize user for session store: {}", e),
        }
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Process-local store, used in tests and short-lived clients.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoredSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoredSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn set_tokens(&self, access: &str, refresh: &str) {
        let mut session = self.lock();
        session.access_token = Some(access.to_string());
        session.refresh_token = Some(refresh.to_string());
    }

    fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    fn clear_tokens(&self) {
        *self.lock() = StoredSession::default();
    }

    fn set_current_user(&self, user: &User) {
        self.lock().store_user(user);
    }

    fn current_user(&self) -> Option<User> {
        self.lock().parse_user()
    }
}

// =============================================================================
// File-Backed Store
// =============================================================================

/// Store persisted as a JSON file, surviving process restarts.
///
/// Writes go through a temp file and rename so a crash mid-write leaves the
/// previous session intact.
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<StoredSession>,
}

impl FileStore {
    /// Open the store at `path`, reading any existing session.
    ///
    /// A missing, unreadable, or malformed file yields an empty session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), "Discarding malformed session file: {}", e);
                StoredSession::default()
            }),
            Err(_) => StoredSession::default(),
        };

        Self {
            path,
            inner: Mutex::new(session),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoredSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the session back to disk. Called under the lock so writes
    /// cannot interleave.
    fn persist(&self, session: &StoredSession) {
        let raw = match serde_json::to_string_pretty(session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to serialize session: {}", e);
                return;
            }
        };

        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, raw).and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            warn!(path = %self.path.display(), "Failed to persist session: {}", e);
        }
    }
}

impl SessionStore for FileStore {
    fn set_tokens(&self, access: &str, refresh: &str) {
        let mut session = self.lock();
        session.access_token = Some(access.to_string());
        session.refresh_token = Some(refresh.to_string());
        self.persist(&session);
    }

    fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    fn clear_tokens(&self) {
        let mut session = self.lock();
        *session = StoredSession::default();
        self.persist(&session);
    }

    fn set_current_user(&self, user: &User) {
        let mut session = self.lock();
        session.store_user(user);
        self.persist(&session);
    }

    fn current_user(&self) -> Option<User> {
        self.lock().parse_user()
    }
}

// =============================================================================
// Tests
// =============================================================================
