//! HTTP client and configuration.

mod auth;
mod http;

pub use auth::AuthSession;
pub use http::{HttpConfig, DEFAULT_BASE_URL};

use crate::api::{
    CollectionsApi, FeedApi, MessagesApi, ProfilesApi, StorageApi, SupportApi, WebhookApi,
};
use crate::error::{Error, Result};
use crate::identity::IdentityResolver;
use crate::store::{LocalStore, MemoryStore};
use http::{build_client, HttpExecutor};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating FanClient.
pub struct FanClientBuilder {
    session: Option<AuthSession>,
    http_config: HttpConfig,
    store: Option<Arc<dyn LocalStore>>,
}

impl std::fmt::Debug for FanClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanClientBuilder")
            .field("session", &self.session.as_ref().map(|s| &s.user_id))
            .field("http_config", &self.http_config)
            .field("store", &self.store.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for FanClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FanClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            session: None,
            http_config: HttpConfig::default(),
            store: None,
        }
    }

    /// Set the authenticated session.
    pub fn session(mut self, access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.session = Some(AuthSession::new(access_token, user_id));
        self
    }

    /// Set the authenticated session from AuthSession.
    pub fn with_session(mut self, session: AuthSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Set the project API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.http_config.api_key = key.into();
        self
    }

    /// Set the external webhook endpoint for message/points processing.
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.webhook_url = Some(url.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Set the local key/value store used for identity fallback and caching.
    pub fn store(mut self, store: Arc<dyn LocalStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build FanClient.
    pub fn build(self) -> Result<FanClient> {
        let http_client = build_client(&self.http_config)?;
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));

        Ok(FanClient {
            inner: Arc::new(ClientInner {
                http: http_client,
                config: self.http_config,
                session: self.session,
                store,
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct ClientInner {
    pub http: reqwest::Client,
    pub config: HttpConfig,
    pub session: Option<AuthSession>,
    /// Local key/value store for identity fallback and soft caches.
    pub store: Arc<dyn LocalStore>,
}

impl ClientInner {
    /// Get the session or error.
    pub fn require_session(&self) -> Result<&AuthSession> {
        self.session.as_ref().ok_or(Error::IdentityUnresolved)
    }

    /// Get the session user id if signed in.
    pub fn session_user_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .filter(|s| s.is_valid())
            .map(|s| s.user_id.as_str())
    }

    /// Create HTTP executor carrying the session credential.
    pub fn executor(&self) -> HttpExecutor<'_> {
        let token = self.session.as_ref().map(|s| s.access_token.as_str());
        HttpExecutor::new(&self.http, &self.config, token)
    }

    /// The configured external webhook endpoint, or error.
    pub fn require_webhook_url(&self) -> Result<&str> {
        self.config
            .webhook_url
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("webhook URL not configured".into()))
    }
}

/// Client for the Fanline hosted backend.
#[derive(Clone)]
pub struct FanClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl FanClient {
    /// Create a new client builder.
    pub fn builder() -> FanClientBuilder {
        FanClientBuilder::new()
    }

    /// Get the feed API.
    pub fn feed(&self) -> FeedApi {
        FeedApi::new(self.inner.clone())
    }

    /// Get the profiles API.
    pub fn profiles(&self) -> ProfilesApi {
        ProfilesApi::new(self.inner.clone())
    }

    /// Get the messages API.
    pub fn messages(&self) -> MessagesApi {
        MessagesApi::new(self.inner.clone())
    }

    /// Get the support/subscription API.
    pub fn support(&self) -> SupportApi {
        SupportApi::new(self.inner.clone())
    }

    /// Get the collections API.
    pub fn collections(&self) -> CollectionsApi {
        CollectionsApi::new(self.inner.clone())
    }

    /// Get the storage API.
    pub fn storage(&self) -> StorageApi {
        StorageApi::new(self.inner.clone())
    }

    /// Get the external webhook gateway.
    pub fn webhook(&self) -> WebhookApi {
        WebhookApi::new(self.inner.clone())
    }

    /// Get the viewer identity resolver.
    pub fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(
            self.inner.session.clone(),
            self.inner.store.clone(),
        )
    }

    /// Check if the client has a session.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_some()
    }

    /// Get the current session if any.
    pub fn session(&self) -> Option<&AuthSession> {
        self.inner.session.as_ref()
    }

    /// Get the local store.
    pub fn store(&self) -> Arc<dyn LocalStore> {
        self.inner.store.clone()
    }
}

impl std::fmt::Debug for FanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanClient")
            .field("authenticated", &self.is_authenticated())
            .field("base_url", &self.inner.config.base_url)
            .finish()
    }
}
