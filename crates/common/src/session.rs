//! Stored session token access.
//!
//! The web client keeps exactly one session token under [`STORED_TOKEN_KEY`]
//! in a key-value store written by the login callback. [`StoredSession`]
//! combines a [`TokenStore`] with the unverified decoder in [`crate::jwt`] so
//! a page can show who is signed in.
//!
//! Claims read through this module are unverified. Use them for display only.

use crate::error::{CommonError, Result};
use crate::jwt::{self, Claims, UserView};
use std::collections::HashMap;
use std::sync::RwLock;

/// Key under which the session token is stored.
pub const STORED_TOKEN_KEY: &str = "auth_token";

/// A string key-value store holding the session token.
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `CommonError::Storage` if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CommonError::Storage` if the store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory [`TokenStore`].
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::warn!(target: "common.session", error = %e, "Token store lock poisoned");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CommonError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CommonError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Read-side view of the stored session token.
pub struct StoredSession<S: TokenStore> {
    store: S,
}

impl<S: TokenStore> StoredSession<S> {
    /// Wrap a token store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The raw stored token, if any.
    pub fn token(&self) -> Option<String> {
        self.store.get(STORED_TOKEN_KEY)
    }

    /// Unverified claims of the stored token.
    pub fn claims(&self) -> Option<Claims> {
        self.token().as_deref().and_then(jwt::decode_claims)
    }

    /// Unverified user view of the stored token.
    pub fn user(&self) -> Option<UserView> {
        self.claims().map(|claims| claims.user_view())
    }

    /// Unverified subject of the stored token.
    pub fn user_id(&self) -> Option<String> {
        self.claims().map(|claims| claims.user_id)
    }

    /// Whether the stored session is missing, unreadable or past `exp`.
    pub fn is_expired(&self) -> bool {
        jwt::is_expired(self.token().as_deref())
    }

    /// Store a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `CommonError::Storage` if the store cannot be written.
    pub fn store(&self, token: &str) -> Result<()> {
        self.store.set(STORED_TOKEN_KEY, token)
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `CommonError::Storage` if the store cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(STORED_TOKEN_KEY)
    }
}
