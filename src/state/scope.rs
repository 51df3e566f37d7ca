//! Turn-scoped state with write-back semantics.
//!
//! A [`StateScope`] loads one item from storage at the start of a turn,
//! hands out references while the turn runs, and writes back on
//! [`StateScope::save_changes`] only when the value actually changed.
//! Nothing reaches storage until the flush, so a turn that fails midway
//! leaves the persisted state untouched.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::state::Storage;

/// Storage key for a scope/id pair.
pub fn storage_key(scope: &str, id: &str) -> String {
    format!("{scope}/{id}")
}

/// One persisted item, cached for the duration of a turn.
pub struct StateScope<T> {
    key: String,
    storage: Arc<dyn Storage>,
    value: T,
    /// Serialized form at load (or last flush), used to skip no-op writes.
    snapshot: Value,
}

impl<T> StateScope<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Load the item stored under `{scope}/{id}`, defaulting when absent.
    /// An absent item snapshots as the default, so an untouched scope is
    /// never written back.
    pub async fn load(
        storage: Arc<dyn Storage>,
        scope: &str,
        id: &str,
    ) -> Result<Self, StoreError> {
        let key = storage_key(scope, id);
        let mut items = storage.read(std::slice::from_ref(&key)).await?;
        let (value, snapshot) = match items.remove(&key) {
            Some(stored) => {
                let value: T = serde_json::from_value(stored.clone())
                    .map_err(|err| StoreError::Serialization(err.to_string()))?;
                (value, stored)
            }
            None => {
                let value = T::default();
                let snapshot = Self::encode(&value)?;
                (value, snapshot)
            }
        };
        Ok(Self { key, storage, value, snapshot })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Persist the cached value if it differs from what was loaded.
    pub async fn save_changes(&mut self) -> Result<(), StoreError> {
        let current = Self::encode(&self.value)?;
        if current == self.snapshot {
            return Ok(());
        }
        self.storage
            .write(HashMap::from([(self.key.clone(), current.clone())]))
            .await?;
        self.snapshot = current;
        Ok(())
    }

    /// Drop the item from storage and reset the cached value to default.
    pub async fn delete(&mut self) -> Result<(), StoreError> {
        self.storage.delete(std::slice::from_ref(&self.key)).await?;
        self.value = T::default();
        self.snapshot = Self::encode(&self.value)?;
        Ok(())
    }

    fn encode(value: &T) -> Result<Value, StoreError> {
        serde_json::to_value(value).map_err(|err| StoreError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStorage;
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: Option<String>,
        age: Option<i64>,
    }

    /// Counts writes so tests can assert that clean turns do not flush.
    struct CountingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    impl CountingStorage {
        fn new() -> Self {
            Self { inner: MemoryStorage::new(), writes: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl Storage for CountingStorage {
        async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, StoreError> {
            self.inner.read(keys).await
        }

        async fn write(&self, changes: HashMap<String, Value>) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.write(changes).await
        }

        async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
            self.inner.delete(keys).await
        }
    }

    #[tokio::test]
    async fn missing_item_loads_as_default() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let scope = StateScope::<Profile>::load(storage, "user", "u1").await.unwrap();
        assert_eq!(*scope.get(), Profile::default());
    }

    #[tokio::test]
    async fn save_persists_and_reload_sees_it() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let mut scope =
            StateScope::<Profile>::load(Arc::clone(&storage), "user", "u1").await.unwrap();
        scope.get_mut().name = Some("Mirja".to_string());
        scope.save_changes().await.unwrap();

        let reloaded = StateScope::<Profile>::load(storage, "user", "u1").await.unwrap();
        assert_eq!(reloaded.get().name.as_deref(), Some("Mirja"));
    }

    #[tokio::test]
    async fn unchanged_value_is_not_written() {
        let storage = Arc::new(CountingStorage::new());

        let mut scope = StateScope::<Profile>::load(
            Arc::clone(&storage) as Arc<dyn Storage>,
            "user",
            "u1",
        )
        .await
        .unwrap();
        scope.save_changes().await.unwrap();
        scope.save_changes().await.unwrap();
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);

        scope.get_mut().age = Some(30);
        scope.save_changes().await.unwrap();
        scope.save_changes().await.unwrap();
        assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scopes_with_same_id_do_not_collide() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let mut dialog =
            StateScope::<Option<String>>::load(Arc::clone(&storage), "dialog", "c1")
                .await
                .unwrap();
        dialog.set(Some("awaiting_name".to_string()));
        dialog.save_changes().await.unwrap();

        let qna = StateScope::<Option<String>>::load(Arc::clone(&storage), "qna_dialog", "c1")
            .await
            .unwrap();
        assert!(qna.get().is_none());
    }

    #[tokio::test]
    async fn delete_clears_storage_and_cache() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let mut scope =
            StateScope::<Profile>::load(Arc::clone(&storage), "user", "u1").await.unwrap();
        scope.get_mut().age = Some(42);
        scope.save_changes().await.unwrap();

        scope.delete().await.unwrap();
        assert_eq!(*scope.get(), Profile::default());

        let reloaded = StateScope::<Profile>::load(storage, "user", "u1").await.unwrap();
        assert_eq!(*reloaded.get(), Profile::default());
    }

    #[tokio::test]
    async fn delete_then_save_does_not_resurrect_old_value() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let mut scope =
            StateScope::<Option<String>>::load(Arc::clone(&storage), "dialog", "c1")
                .await
                .unwrap();
        scope.set(Some("awaiting_age".to_string()));
        scope.save_changes().await.unwrap();

        scope.delete().await.unwrap();
        scope.save_changes().await.unwrap();

        let reloaded =
            StateScope::<Option<String>>::load(storage, "dialog", "c1").await.unwrap();
        assert!(reloaded.get().is_none());
    }
}
