//! Viewer identity resolution.
//!
//! Produces a best-available identifier for "who is asking". Sources are
//! tried in a fixed priority order, each step pure given its inputs: the
//! auth session, then locally persisted keys, then the cached id for the
//! signed-in email, then (feed contexts only) a synthesized placeholder.

use std::sync::Arc;

use crate::client::AuthSession;
use crate::error::{Error, Result};
use crate::store::{id_for_email, wellknown, LocalStore, LocalStoreExt};

/// Placeholder identity used in feed contexts when the viewer is
/// authenticated-but-unidentifiable. Never used for messaging.
pub const PLACEHOLDER_VIEWER_ID: &str = "anonymous-viewer";

/// Where the resolved identity will be used. Messaging must not operate on
/// a synthesized identity; feed rendering may.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityContext {
    /// Feed viewing; a placeholder is acceptable as a last resort.
    Feed,
    /// Messaging; only a real identity is acceptable.
    Messaging,
}

/// Resolves the current viewer's identifier from session and local store.
pub struct IdentityResolver {
    session: Option<AuthSession>,
    store: Arc<dyn LocalStore>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("session", &self.session.as_ref().map(|s| &s.user_id))
            .finish()
    }
}

impl IdentityResolver {
    /// Create a resolver over the given session and store.
    pub fn new(session: Option<AuthSession>, store: Arc<dyn LocalStore>) -> Self {
        Self { session, store }
    }

    /// Resolve the viewer id, or fail with `IdentityUnresolved`. Callers
    /// receiving the error must surface a sign-in state and must not fetch.
    pub async fn resolve(&self, context: IdentityContext) -> Result<String> {
        // 1. Active auth session; write the id back for future fallback.
        if let Some(session) = self.session.as_ref().filter(|s| s.is_valid()) {
            self.store
                .set(wellknown::CURRENT_USER_ID, &session.user_id)
                .await;
            if let Some(email) = &session.email {
                self.store.set(wellknown::LOGGED_IN_EMAIL, email).await;
                self.store
                    .set(&id_for_email(email), &session.user_id)
                    .await;
            }
            return Ok(session.user_id.clone());
        }

        // 2. Persisted keys, fixed priority order.
        for key in [wellknown::CURRENT_USER_ID, wellknown::PUBLIC_ID] {
            if let Some(id) = self.store.get_non_empty(key).await {
                return Ok(id);
            }
        }

        // 3. Cached id for the signed-in email.
        if let Some(email) = self.store.get_non_empty(wellknown::LOGGED_IN_EMAIL).await {
            if let Some(id) = self.store.get_non_empty(&id_for_email(&email)).await {
                return Ok(id);
            }
        }

        // 4. Feed contexts tolerate an unidentifiable viewer.
        match context {
            IdentityContext::Feed => Ok(PLACEHOLDER_VIEWER_ID.to_owned()),
            IdentityContext::Messaging => Err(Error::IdentityUnresolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_session_wins_and_writes_back() {
        let store = store();
        store.set(wellknown::CURRENT_USER_ID, "stale").await;

        let session = AuthSession::new("tok", "u-1").with_email("ada@x.com");
        let resolver = IdentityResolver::new(Some(session), store.clone());

        let id = resolver.resolve(IdentityContext::Feed).await.unwrap();
        assert_eq!(id, "u-1");
        assert_eq!(
            store.get(wellknown::CURRENT_USER_ID).await,
            Some("u-1".into())
        );
        assert_eq!(store.get(&id_for_email("ada@x.com")).await, Some("u-1".into()));
    }

    #[tokio::test]
    async fn test_store_key_priority() {
        let store = store();
        store.set(wellknown::PUBLIC_ID, "pub-1").await;
        store.set(wellknown::CURRENT_USER_ID, "u-2").await;

        let resolver = IdentityResolver::new(None, store);
        let id = resolver.resolve(IdentityContext::Messaging).await.unwrap();
        assert_eq!(id, "u-2");
    }

    #[tokio::test]
    async fn test_email_cache_fallback() {
        let store = store();
        store.set(wellknown::LOGGED_IN_EMAIL, "ada@x.com").await;
        store.set(&id_for_email("ada@x.com"), "u-3").await;

        let resolver = IdentityResolver::new(None, store);
        let id = resolver.resolve(IdentityContext::Messaging).await.unwrap();
        assert_eq!(id, "u-3");
    }

    #[tokio::test]
    async fn test_placeholder_only_for_feed() {
        let resolver = IdentityResolver::new(None, store());

        let feed_id = resolver.resolve(IdentityContext::Feed).await.unwrap();
        assert_eq!(feed_id, PLACEHOLDER_VIEWER_ID);

        let err = resolver
            .resolve(IdentityContext::Messaging)
            .await
            .unwrap_err();
        assert!(err.is_identity_error());
    }

    #[tokio::test]
    async fn test_invalid_session_falls_through() {
        let store = store();
        store.set(wellknown::CURRENT_USER_ID, "u-4").await;

        let resolver = IdentityResolver::new(Some(AuthSession::new("", "")), store);
        let id = resolver.resolve(IdentityContext::Feed).await.unwrap();
        assert_eq!(id, "u-4");
    }
}
