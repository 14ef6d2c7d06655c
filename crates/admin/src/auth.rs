//! Authentication state holder.
//!
//! The backend issues an opaque bearer token. It is kept in durable storage
//! under [`TOKEN_KEY`] and mirrored in memory so every consumer sees the
//! same value.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::storage::{ClientStore, StorageError, TOKEN_KEY};

/// Holder of the single optional bearer token.
pub struct AuthState {
    store: Arc<dyn ClientStore>,
    token: Mutex<Option<SecretString>>,
}

impl AuthState {
    /// Rehydrate from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored token cannot be read.
    pub fn load(store: Arc<dyn ClientStore>) -> Result<Self, StorageError> {
        let token = store
            .get(TOKEN_KEY)?
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);
        Ok(Self {
            store,
            token: Mutex::new(token),
        })
    }

    /// Store a freshly issued token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be persisted. The in-memory
    /// token is left unchanged in that case.
    pub fn login(&self, token: SecretString) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token.expose_secret())?;
        *self.lock() = Some(token);
        info!("Stored session token");
        Ok(())
    }

    /// Forget the token, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored token cannot be deleted.
    pub fn logout(&self) -> Result<(), StorageError> {
        *self.lock() = None;
        self.store.remove(TOKEN_KEY)?;
        info!("Cleared session token");
        Ok(())
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.lock().clone()
    }

    /// Whether a non-blank token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<SecretString>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.is_authenticated() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("AuthState")
            .field("token", &token)
            .finish_non_exhaustive()
    }
}
