//! Client-side persistence of the session token.
//!
//! The client keeps exactly one persisted entry: the session token string.
//! Absence of the entry means "unauthenticated". This module owns no logic
//! about the storage medium; a browser host would back it with local
//! storage, native consumers and tests use the in-memory implementation.

use mockall::automock;
use std::sync::Mutex;
use std::sync::MutexGuard;

/// Name of the single persisted entry holding the session token.
pub const TOKEN_KEY: &str = "token";

/// Trait abstracting the key-value store the token lives in.
///
/// The session manager exclusively owns the write path ([`save`] and
/// [`clear`]); the API connector reads the token before every request.
///
/// [`save`]: TokenStore::save
/// [`clear`]: TokenStore::clear
#[automock]
pub trait TokenStore {
    /// Persists the token, replacing any previous one.
    fn save(&self, token: &str);
    /// Returns the persisted token, if any.
    fn load(&self) -> Option<String>;
    /// Removes the persisted token. A no-op when none is present.
    fn clear(&self);
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn save(&self, token: &str) {
        (**self).save(token)
    }

    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self) -> MutexGuard<'_, Option<String>> {
        // A poisoned lock can only mean a panic elsewhere; the token itself
        // is still usable.
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for InMemoryTokenStore {
    fn save(&self, token: &str) {
        *self.entry() = Some(token.to_string());
    }

    fn load(&self) -> Option<String> {
        self.entry().clone()
    }

    fn clear(&self) {
        *self.entry() = None;
    }
}
