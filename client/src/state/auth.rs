//! Auth-session state for the current client user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login screens call [`AuthStore::set_auth`], profile refreshes call
//! [`AuthStore::set_user`], and sign-out calls [`AuthStore::logout`]. The
//! request layer reads [`AuthStore::bearer_header`] for outgoing calls.
//! Components observe the mirrored signal from [`super::context`].
//!
//! DESIGN
//! ======
//! The store is a single-writer, multi-reader cell. Each transition replaces
//! the whole [`AuthState`] under one write lock, so readers see either the old
//! or the new state and never a mix. `is_authenticated` is derived from `user`
//! and cannot be written directly.
//!
//! After every transition the `{ user, token }` projection is written through
//! to the storage backend under [`STORAGE_KEY`], in the same order the
//! transitions were applied. Storage failures are logged and dropped; the
//! in-memory state stays authoritative.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::net::types::{AuthResponse, User};
use crate::util::storage::{MemoryStorage, StorageBackend};

/// Key of the persisted auth record.
pub const STORAGE_KEY: &str = "auth-storage";

/// Version written alongside the record. Records with another version are
/// discarded at load.
pub const STORAGE_VERSION: u32 = 0;

/// Snapshot of the client's identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn from_persisted(persisted: PersistedAuth) -> Self {
        Self { is_authenticated: persisted.user.is_some(), user: persisted.user, token: persisted.token }
    }
}

/// The only fields that reach storage.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedAuth {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    state: PersistedAuth,
    version: u32,
}

type Listener = Box<dyn Fn(&AuthState) + Send + Sync>;

struct Inner {
    state: RwLock<AuthState>,
    /// Held across apply, persist and notify so storage and listeners see
    /// transitions in the order they hit memory.
    commit: Mutex<()>,
    listeners: RwLock<Vec<Listener>>,
    backend: Arc<dyn StorageBackend>,
}

/// Shared handle to the client auth state. Cloning is cheap and every clone
/// refers to the same store.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore").field("state", &self.snapshot()).finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Rehydrate from `backend`. A missing, unreadable, corrupt, or
    /// wrong-version record yields the signed-out state.
    pub fn open(backend: Arc<dyn StorageBackend>) -> Self {
        let state = rehydrate(backend.as_ref());
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                commit: Mutex::new(()),
                listeners: RwLock::new(Vec::new()),
                backend,
            }),
        }
    }

    /// A store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()))
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn snapshot(&self) -> AuthState {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().user
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    /// `Authorization` header value for outgoing requests, if a token is held.
    pub fn bearer_header(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {token}"))
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Replace the user. Leaves the token alone.
    pub fn set_user(&self, user: Option<User>) {
        self.transition(move |current| AuthState {
            is_authenticated: user.is_some(),
            user,
            token: current.token.clone(),
        });
    }

    /// Replace the token. Never changes `is_authenticated`.
    pub fn set_token(&self, token: Option<String>) {
        self.transition(move |current| AuthState { token, ..current.clone() });
    }

    /// Sign in: set user and token together.
    pub fn set_auth(&self, user: User, token: String) {
        self.transition(move |_| AuthState { user: Some(user), token: Some(token), is_authenticated: true });
    }

    /// [`AuthStore::set_auth`] from a login or registration response.
    pub fn accept_login(&self, response: AuthResponse) {
        self.set_auth(response.user, response.token);
    }

    /// Clear user and token. Repeated calls leave the same signed-out state.
    pub fn logout(&self) {
        self.transition(|_| AuthState::default());
    }

    /// Register `listener` to run after every transition with the new state.
    ///
    /// Listeners run on the mutating thread while the commit lock is held; a
    /// listener that mutates this store will deadlock.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + Send + Sync + 'static) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    fn transition(&self, next: impl FnOnce(&AuthState) -> AuthState) {
        let _commit = self.inner.commit.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = next(&state);
            state.clone()
        };

        self.persist(&snapshot);
        for listener in self.inner.listeners.read().unwrap_or_else(PoisonError::into_inner).iter() {
            listener(&snapshot);
        }
    }

    fn persist(&self, state: &AuthState) {
        let record = PersistedRecord {
            state: PersistedAuth { user: state.user.clone(), token: state.token.clone() },
            version: STORAGE_VERSION,
        };
        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("failed to encode auth state: {e}");
                return;
            }
        };
        if let Err(e) = self.inner.backend.set_item(STORAGE_KEY, &raw) {
            log::warn!("failed to persist auth state: {e}");
        }
    }
}

fn rehydrate(backend: &dyn StorageBackend) -> AuthState {
    let raw = match backend.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AuthState::default(),
        Err(e) => {
            log::warn!("failed to read persisted auth state: {e}");
            return AuthState::default();
        }
    };

    match serde_json::from_str::<PersistedRecord>(&raw) {
        Ok(record) if record.version == STORAGE_VERSION => AuthState::from_persisted(record.state),
        Ok(record) => {
            log::warn!("discarding persisted auth state with version {}", record.version);
            AuthState::default()
        }
        Err(e) => {
            log::warn!("discarding unreadable persisted auth state: {e}");
            AuthState::default()
        }
    }
}
