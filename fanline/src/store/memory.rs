//! In-memory store implementation.

use async_trait::async_trait;
use std::{collections::HashMap, sync::RwLock};

use super::traits::LocalStore;

/// In-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let data = self.data.read().unwrap();
        data.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        let mut data = self.data.write().unwrap();
        data.insert(key.to_owned(), value.to_owned());
    }

    async fn remove(&self, key: &str) {
        let mut data = self.data.write().unwrap();
        data.remove(key);
    }

    async fn clear(&self) {
        let mut data = self.data.write().unwrap();
        data.clear();
    }

    async fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        let data = self.data.read().unwrap();
        data.keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() {
        let store = MemoryStore::new();

        store.set("key1", "value1").await;
        assert_eq!(store.get("key1").await, Some("value1".to_owned()));

        store.remove("key1").await;
        assert_eq!(store.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let store = MemoryStore::new();

        store.set("key", "first").await;
        store.set("key", "second").await;
        assert_eq!(store.get("key").await, Some("second".to_owned()));
    }

    #[tokio::test]
    async fn test_scan_prefix() {
        let store = MemoryStore::new();

        store.set("id_for_email/a@x.com", "1").await;
        store.set("id_for_email/b@x.com", "2").await;
        store.set("username", "ada").await;

        let keys = store.scan_prefix("id_for_email/").await;
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| k.starts_with("id_for_email/")));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();

        store.set("a", "1").await;
        store.set("b", "2").await;

        store.clear().await;

        assert!(store.is_empty());
    }
}
