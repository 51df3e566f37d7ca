//! Key/value persistence behind the state scopes.
//!
//! The contract is deliberately small: batch read, batch upsert, batch
//! delete, everything stored as JSON values. The in-memory implementation
//! is the default and loses state on restart, which is what the bot wants
//! during development against the channel emulator.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Backing store for per-user and per-conversation state.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the items for `keys`. Missing keys are simply absent from the
    /// returned map, never an error.
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, StoreError>;

    /// Upsert every entry in `changes`.
    async fn write(&self, changes: HashMap<String, Value>) -> Result<(), StoreError>;

    /// Remove `keys`. Deleting a key that does not exist is a no-op.
    async fn delete(&self, keys: &[String]) -> Result<(), StoreError>;
}

/// Volatile [`Storage`] backed by a shared map.
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, StoreError> {
        let items = self.items.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| items.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn write(&self, changes: HashMap<String, Value>) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        items.extend(changes);
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn write_then_read_roundtrips() {
        let storage = MemoryStorage::new();
        storage
            .write(HashMap::from([("user/u1".to_string(), json!({"name": "Mirja"}))]))
            .await
            .unwrap();

        let items = storage.read(&["user/u1".to_string()]).await.unwrap();
        assert_eq!(items["user/u1"], json!({"name": "Mirja"}));
    }

    #[tokio::test]
    async fn missing_keys_are_absent_not_errors() {
        let storage = MemoryStorage::new();
        let items = storage
            .read(&["user/u1".to_string(), "dialog/c1".to_string()])
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn write_overwrites_existing_item() {
        let storage = MemoryStorage::new();
        storage
            .write(HashMap::from([("dialog/c1".to_string(), json!("awaiting_name"))]))
            .await
            .unwrap();
        storage
            .write(HashMap::from([("dialog/c1".to_string(), json!("awaiting_age"))]))
            .await
            .unwrap();

        let items = storage.read(&["dialog/c1".to_string()]).await.unwrap();
        assert_eq!(items["dialog/c1"], json!("awaiting_age"));
    }

    #[tokio::test]
    async fn delete_removes_items_and_tolerates_missing() {
        let storage = MemoryStorage::new();
        storage
            .write(HashMap::from([("user/u1".to_string(), json!(1))]))
            .await
            .unwrap();

        storage
            .delete(&["user/u1".to_string(), "user/u2".to_string()])
            .await
            .unwrap();

        let items = storage.read(&["user/u1".to_string()]).await.unwrap();
        assert!(items.is_empty());
    }
}
