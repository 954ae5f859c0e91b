//! Credential token lifecycle
//!
//! The token is set on login or registration, cleared on logout, and
//! read from storage exactly once when the store is built. Every change
//! is written through to the [`TokenStore`] before the setter returns.

use crate::model::Token;
use crate::storage::TokenStore;
use tracing::{info, warn};

/// Holds the current credential and mirrors it to durable storage.
#[derive(Debug)]
pub struct AuthStore<S: TokenStore> {
    store: S,
    token: Option<Token>,
}

impl<S: TokenStore> AuthStore<S> {
    /// Build the store, loading any persisted token.
    ///
    /// A read error or an entry that does not parse is logged and
    /// treated as logged out; this never fails.
    pub fn new(store: S) -> Self {
        let token = match store.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Token>(&raw) {
                Ok(token) => Some(token),
                Err(e) => {
                    warn!("Ignoring unreadable stored token: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to load stored token: {}", e);
                None
            }
        };
        Self { store, token }
    }

    /// Replace the current token and persist the change.
    ///
    /// Storage failures are logged; the in-memory token is updated
    /// regardless.
    pub fn set_token(&mut self, token: Option<Token>) {
        match &token {
            Some(t) => match serde_json::to_string(t) {
                Ok(raw) => {
                    if let Err(e) = self.store.save(&raw) {
                        warn!("Failed to save token: {}", e);
                    }
                }
                Err(e) => warn!("Failed to serialize token: {}", e),
            },
            None => {
                if let Err(e) = self.store.clear() {
                    warn!("Failed to clear stored token: {}", e);
                }
            }
        }
        self.token = token;
    }

    /// Drop the credential.
    pub fn logout(&mut self) {
        if self.token.is_some() {
            info!("Logging out");
        }
        self.set_token(None);
    }

    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.api_key.as_str())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.token.as_ref().and_then(|t| t.email.as_deref())
    }

    /// The underlying storage port.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.store
    }
}
