//! PlumbConnect HTTP client

pub mod articles;
pub mod auth;
pub mod chats;
pub mod complaints;
pub mod config;
pub mod error;
pub mod notifications;
pub mod posts;
pub mod reports;
pub mod request;
pub mod services;
pub mod session;
pub mod users;

mod gateway;
mod refresh;

pub use config::ClientConfig;
pub use error::{ClientError, RefreshError};
pub use request::{ApiRequest, FormField, RequestBody};
pub use session::{SessionNavigator, TokenStorage, TracingNavigator};

use crate::types::ListPayload;
use plumb_core::{KeyValueStore, MemoryStore};
use refresh::RefreshCoordinator;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// PlumbConnect API client
///
/// Cheap to clone; clones share the session storage and the refresh state,
/// so a refresh triggered through one clone is observed by all of them.
#[derive(Clone)]
pub struct PlumbClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    base_url: String,
    login_path: String,
    storage: TokenStorage,
    navigator: Arc<dyn SessionNavigator>,
    refresh: RefreshCoordinator,
}

impl PlumbClient {
    /// Create a new client with default configuration and in-memory storage
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> PlumbClientBuilder {
        PlumbClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Session storage backing this client
    pub fn storage(&self) -> &TokenStorage {
        &self.inner.storage
    }

    /// Whether an access token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.inner.storage.access_token().is_some()
    }

    /// Whether a token refresh is running right now
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Send an authenticated request and decode a JSON success body
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let response = self.send(&request).await?;
        Self::decode(response).await
    }

    /// Send an authenticated request whose success body is irrelevant
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        let response = self.send(&request).await?;
        Self::ensure_success(response).await.map(drop)
    }

    /// Send an authenticated request to a list endpoint
    ///
    /// Accepts both the paginated `{ "results": [...] }` envelope and a bare
    /// array.
    pub async fn execute_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>, ClientError> {
        let payload: ListPayload<T> = self.execute(request).await?;
        Ok(payload.into_vec())
    }

    /// Send an authenticated request and report only the success status
    pub async fn execute_status(&self, request: ApiRequest) -> Result<StatusCode, ClientError> {
        let response = self.send(&request).await?;
        Ok(Self::ensure_success(response).await?.status())
    }

    /// Send a request without credentials and decode a JSON success body
    pub async fn execute_public<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(&request, None).await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_response(status, &body))
        }
    }
}

impl std::fmt::Debug for PlumbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlumbClient")
            .field("base_url", &self.inner.base_url)
            .field("storage", &self.inner.storage)
            .finish_non_exhaustive()
    }
}

/// Builder for PlumbClient
#[derive(Default)]
pub struct PlumbClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    login_path: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
    navigator: Option<Arc<dyn SessionNavigator>>,
}

impl PlumbClientBuilder {
    /// Take base URL, timeout, user agent and login path from `config`
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.timeout = config.timeout();
        self.user_agent = Some(config.user_agent.clone());
        self.login_path = Some(config.login_path.clone());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the route used when the session has to be abandoned
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set where tokens and the cached profile are kept
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the hook notified when a refresh fails
    pub fn navigator(mut self, navigator: Arc<dyn SessionNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PlumbClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|err| ClientError::Configuration(format!("invalid base_url {base_url}: {err}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let defaults = ClientConfig::default();
        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.unwrap_or(defaults.user_agent));

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let http = client_builder.build()?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        Ok(PlumbClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                login_path: self.login_path.unwrap_or(defaults.login_path),
                storage: TokenStorage::new(store),
                navigator: self
                    .navigator
                    .unwrap_or_else(|| Arc::new(TracingNavigator)),
                refresh: RefreshCoordinator::default(),
            }),
        })
    }
}
