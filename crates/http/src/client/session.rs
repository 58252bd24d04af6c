//! Session state: persisted tokens and the logged-out redirect

use crate::types::User;
use plumb_core::{CoreResult, KeyValueStore};
use std::sync::Arc;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_DATA_KEY: &str = "user_data";

/// Typed accessor over the key/value store holding the session
#[derive(Clone)]
pub struct TokenStorage {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Persist a new access token, and the refresh token when one is given
    pub fn store_tokens(&self, access: &str, refresh: Option<&str>) -> CoreResult<()> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        if let Some(refresh) = refresh {
            self.store.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        Ok(())
    }

    /// Cache the signed-in user's profile
    pub fn store_user(&self, user: &User) -> CoreResult<()> {
        let json = serde_json::to_string(user)?;
        self.store.set(USER_DATA_KEY, &json)
    }

    /// Cached profile; a corrupt entry reads as absent
    pub fn current_user(&self) -> Option<User> {
        let json = self.store.get(USER_DATA_KEY)?;
        serde_json::from_str(&json)
            .inspect_err(|err| warn!("Ignoring unreadable cached user profile: {err}"))
            .ok()
    }

    /// Remove tokens and the cached profile
    ///
    /// Every key is attempted even if an earlier removal fails.
    pub fn clear(&self) -> CoreResult<()> {
        let results = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY]
            .map(|key| self.store.remove(key));
        results.into_iter().collect()
    }
}

impl std::fmt::Debug for TokenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStorage")
            .field("has_access_token", &self.access_token().is_some())
            .field("has_refresh_token", &self.refresh_token().is_some())
            .finish()
    }
}

/// Sends the user session to a route, e.g. the login page
pub trait SessionNavigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> SessionNavigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Default navigator for headless callers: records the redirect in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl SessionNavigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        warn!(target: "plumb_http::session", path, "Session ended, sign in again");
    }
}
