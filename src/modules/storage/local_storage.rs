use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BlobBackend, StorageError};

/// Process-local string key/value store (getItem/setItem)
#[derive(Debug, Default)]
pub struct LocalStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }
}

/// Collection document stored under one key of a [`LocalStorage`]
pub struct LocalStorageBlob {
    storage: Arc<LocalStorage>,
    key: String,
}

impl LocalStorageBlob {
    pub fn new(storage: Arc<LocalStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

#[async_trait]
impl BlobBackend for LocalStorageBlob {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get_item(&self.key).await)
    }

    async fn write(&self, contents: String) -> Result<(), StorageError> {
        self.storage.set_item(&self.key, contents).await;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("local-storage:{}", self.key)
    }
}
