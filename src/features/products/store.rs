//! Record store for products.
//!
//! [`JsonRecordStore`] keeps the whole collection as one JSON array inside a
//! [`BlobBackend`]; every mutation is a full read-modify-write of that
//! document. Mutations are serialized per store instance.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::core::error::Result;
use crate::features::products::models::{NewProduct, Product};
use crate::modules::storage::{BlobBackend, StorageError};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Current contents, order unspecified
    async fn list(&self) -> Result<Vec<Product>>;

    /// Assign an id, persist and return the stored record
    async fn append(&self, new_product: NewProduct) -> Result<Product>;

    /// Delete the record with `id`; returns whether one was removed
    async fn remove(&self, id: i64) -> Result<bool>;

    fn describe(&self) -> String;
}

pub struct JsonRecordStore {
    backend: Box<dyn BlobBackend>,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(backend: Box<dyn BlobBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Product>> {
        let Some(contents) = self.backend.read().await? else {
            return Ok(Vec::new());
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            tracing::error!(
                "Failed to parse product collection from {}: {}",
                self.backend.describe(),
                e
            );
            StorageError::from(e).into()
        })
    }

    async fn save(&self, products: &[Product]) -> Result<()> {
        let encoded = if self.backend.pretty() {
            serde_json::to_string_pretty(products)
        } else {
            serde_json::to_string(products)
        };
        let contents = encoded.map_err(StorageError::from)?;

        self.backend.write(contents).await?;
        Ok(())
    }
}

/// Creation-timestamp id, bumped past the current maximum on collision
fn next_id(existing: &[Product]) -> i64 {
    let timestamp = Utc::now().timestamp_millis();
    match existing.iter().map(|p| p.id).max() {
        Some(max) if max >= timestamp => max + 1,
        _ => timestamp,
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn list(&self) -> Result<Vec<Product>> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    async fn append(&self, new_product: NewProduct) -> Result<Product> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.load().await?;
        let product = new_product.into_product(next_id(&products));
        products.push(product.clone());
        self.save(&products).await?;

        Ok(product)
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.load().await?;
        let before = products.len();
        products.retain(|p| p.id != id);
        let removed = products.len() != before;

        self.save(&products).await?;
        Ok(removed)
    }

    fn describe(&self) -> String {
        self.backend.describe()
    }
}
