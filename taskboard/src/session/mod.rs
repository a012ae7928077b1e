//! Session lifecycle management.
//!
//! Owns the authentication credential from acquisition to teardown: login
//! exchanges credentials for a token and persists it, logout clears it and
//! signals the presentation layer to navigate back to the unauthenticated
//! entry point. There is no token-expiry detection; an expired token is only
//! discovered when the server rejects a later request, and that rejection is
//! surfaced as an ordinary store error rather than a forced logout.

use crate::connectors::api::ApiConnector;
use crate::connectors::storage::TokenStore;
use log::error;
use mockall::automock;
use serde_json::{Value, json};

pub(crate) const LOGIN_PATH: &str = "/login";

/// Navigation boundary of the presentation layer.
///
/// The core never renders anything itself; on logout it asks the consumer to
/// move the user to the login view through this trait.
#[automock]
pub trait Navigator {
    /// Sends the user to the unauthenticated entry point.
    fn to_login(&self);
}

/// Owns the write path of the session token.
pub struct SessionManager<'a, API: ApiConnector, STORE: TokenStore, NAV: Navigator> {
    api: &'a API,
    tokens: &'a STORE,
    navigator: &'a NAV,
}

impl<'a, API: ApiConnector, STORE: TokenStore, NAV: Navigator> SessionManager<'a, API, STORE, NAV> {
    pub fn new(api: &'a API, tokens: &'a STORE, navigator: &'a NAV) -> Self {
        Self {
            api,
            tokens,
            navigator,
        }
    }

    /// Exchanges credentials for a session token.
    ///
    /// On success the token is persisted to the token store and returned. On
    /// any failure, whether the server rejected the credentials, the network
    /// failed, or the response body was malformed, the failure is logged and
    /// `None` is returned; login never propagates an error to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Option<String> {
        let credentials = json!({ "username": username, "password": password });
        let body = match self.api.post(LOGIN_PATH, credentials).await {
            Ok(body) => body,
            Err(err) => {
                error!("Failed to log in: {err}");
                return None;
            }
        };
        let Some(token) = body.get("token").and_then(Value::as_str) else {
            error!("Login response did not contain a token");
            return None;
        };
        self.tokens.save(token);
        Some(token.to_string())
    }

    /// Ends the session.
    ///
    /// Clears the persisted token and signals the presentation layer to
    /// navigate to the login view. Idempotent: with no active session this
    /// is a no-op beyond the navigation signal.
    pub fn logout(&self) {
        self.tokens.clear();
        self.navigator.to_login();
    }
}
