//! Local store trait definitions.

use async_trait::async_trait;

use crate::error::Result;

/// Trait for local key/value persistence backends.
///
/// Used as a fallback identity source and a soft cache. Writes are
/// idempotent last-writer-wins; stored values are either immutable facts
/// (an id for a given email does not change) or safely recomputable.
#[async_trait]
pub trait LocalStore: Send + Sync + std::fmt::Debug {
    /// Get a value by key.
    async fn get(&self, key: &str) -> Option<String>;

    /// Set a value.
    async fn set(&self, key: &str, value: &str);

    /// Remove a value by key.
    async fn remove(&self, key: &str);

    /// Clear all stored values.
    async fn clear(&self);

    /// Scan keys with a prefix.
    async fn scan_prefix(&self, prefix: &str) -> Vec<String>;
}

/// Extension trait for typed store operations.
#[async_trait]
pub trait LocalStoreExt: LocalStore {
    /// Get a JSON-deserialized value.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let data = self.get(key).await?;
        serde_json::from_str(&data).ok()
    }

    /// Set a JSON-serialized value.
    async fn set_json<T: serde::Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_string(value).map_err(crate::error::Error::Json)?;
        self.set(key, &data).await;
        Ok(())
    }

    /// Get a non-empty value by key.
    async fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).await.filter(|v| !v.trim().is_empty())
    }
}

// Blanket implementation
impl<T: LocalStore + ?Sized> LocalStoreExt for T {}
