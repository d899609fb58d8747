use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tokio::sync::{watch, Mutex};

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{CreateProductDto, ProductListViewDto, QuickAddPresetDto};
use crate::features::products::models::{
    format_expiry_date, parse_expiry_date, NewProduct, Product,
};
use crate::features::products::state::{InventoryEvent, InventoryState};
use crate::features::products::store::RecordStore;
use crate::shared::clock::Clock;
use crate::shared::constants::{QUICK_ADD_CATEGORY, QUICK_ADD_ITEMS, QUICK_ADD_SHELF_LIFE_DAYS};

/// Service for product inventory operations
///
/// Owns the record store and publishes the latest [`InventoryState`] to
/// subscribers after every successful mutation. Store calls and the publish
/// that follows them run under `sync`, so a snapshot read before a mutation
/// is never published after it.
pub struct ProductService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<InventoryState>,
    sync: Mutex<()>,
}

impl ProductService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(InventoryState::default());
        Self {
            store,
            clock,
            state,
            sync: Mutex::new(()),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn subscribe(&self) -> watch::Receiver<InventoryState> {
        self.state.subscribe()
    }

    fn publish(&self, event: InventoryEvent) {
        self.state.send_modify(|state| {
            *state = std::mem::take(state).apply(event);
        });
    }

    /// Read the store and publish it if it differs from the last snapshot
    pub async fn refresh(&self) -> Result<Vec<Product>> {
        let _guard = self.sync.lock().await;
        let products = self.store.list().await?;
        self.state.send_if_modified(|state| {
            if state.items == products {
                return false;
            }
            *state = std::mem::take(state).apply(InventoryEvent::Loaded(products.clone()));
            true
        });
        Ok(products)
    }

    /// List all products, unordered
    pub async fn list(&self) -> Result<Vec<Product>> {
        self.refresh().await
    }

    /// Add a product from a validated request
    pub async fn create(&self, dto: CreateProductDto) -> Result<Product> {
        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("Name is required".to_string()))?;

        let expiry_date = dto
            .expiry_date
            .as_deref()
            .and_then(parse_expiry_date)
            .ok_or_else(|| {
                AppError::Validation("Expiry date must be a valid YYYY-MM-DD date".to_string())
            })?;

        let category = dto
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let _guard = self.sync.lock().await;
        let product = self
            .store
            .append(NewProduct {
                name,
                expiry_date,
                category,
            })
            .await?;

        tracing::info!(
            "Product created: id={}, name={}, expiry_date={}",
            product.id,
            product.name,
            expiry_date
        );

        self.publish(InventoryEvent::Added(product.clone()));
        Ok(product)
    }

    /// Delete a product; absent ids are not an error
    pub async fn delete(&self, id: i64) -> Result<()> {
        let _guard = self.sync.lock().await;
        let removed = self.store.remove(id).await?;

        if removed {
            tracing::info!("Product deleted: id={}", id);
            self.publish(InventoryEvent::Removed(id));
        } else {
            tracing::debug!("Delete of unknown product id={} ignored", id);
        }

        Ok(())
    }

    /// Filtered, sorted and decorated list for display
    pub async fn view(&self, search_term: &str) -> Result<ProductListViewDto> {
        let products = self.refresh().await?;
        let state = InventoryState {
            items: products,
            search_term: search_term.to_string(),
        };
        let view: ProductListViewDto = state.view(self.today()).into();
        Ok(view)
    }

    /// Quick-add presets expiring one week from today
    pub fn quick_add_presets(&self) -> Vec<QuickAddPresetDto> {
        let expiry_date =
            format_expiry_date(self.today() + Duration::days(QUICK_ADD_SHELF_LIFE_DAYS));

        QUICK_ADD_ITEMS
            .iter()
            .map(|(icon, name)| QuickAddPresetDto {
                icon: icon.to_string(),
                name: name.to_string(),
                expiry_date: expiry_date.clone(),
                category: QUICK_ADD_CATEGORY.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::store::JsonRecordStore;
    use crate::features::products::view_model::ListState;
    use crate::modules::storage::{LocalStorage, LocalStorageBlob};
    use crate::shared::clock::FixedClock;
    use crate::shared::constants::LOCAL_STORAGE_KEY;
    use crate::shared::test_helpers::{create_dto, date, test_service};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    /// Store whose first `list` pauses after reading until released
    struct PausingStore {
        inner: JsonRecordStore,
        armed: AtomicBool,
        read_done: Notify,
        release: Notify,
    }

    #[async_trait]
    impl RecordStore for PausingStore {
        async fn list(&self) -> Result<Vec<Product>> {
            let products = self.inner.list().await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.read_done.notify_one();
                self.release.notified().await;
            }
            Ok(products)
        }

        async fn append(&self, new_product: NewProduct) -> Result<Product> {
            self.inner.append(new_product).await
        }

        async fn remove(&self, id: i64) -> Result<bool> {
            self.inner.remove(id).await
        }

        fn describe(&self) -> String {
            self.inner.describe()
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_persists() {
        let service = test_service(date(2024, 6, 10));

        let product = service
            .create(CreateProductDto {
                name: Some("  Milk ".to_string()),
                expiry_date: Some("2024-06-12".to_string()),
                category: Some("  ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(product.name, "Milk");
        assert_eq!(product.expiry_date, Some(date(2024, 6, 12)));
        assert_eq!(product.category, None);
        assert_eq!(service.list().await.unwrap(), vec![product]);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let service = test_service(date(2024, 6, 10));

        let err = service
            .create(CreateProductDto {
                name: Some("Milk".to_string()),
                expiry_date: None,
                category: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ok() {
        let service = test_service(date(2024, 6, 10));
        service.create(create_dto("Milk", "2024-06-12")).await.unwrap();

        service.delete(12345).await.unwrap();

        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_view_scenario() {
        let service = test_service(date(2024, 6, 10));
        service.create(create_dto("C", "2024-06-20")).await.unwrap();
        service.create(create_dto("A", "2024-06-09")).await.unwrap();
        service.create(create_dto("B", "2024-06-12")).await.unwrap();

        let view = service.view("").await.unwrap();

        assert_eq!(view.state, ListState::Items);
        let labels: Vec<(&str, Option<&str>)> = view
            .items
            .iter()
            .map(|i| (i.name.as_str(), i.label.as_deref()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("A", Some("⚠️ EXPIRED")),
                ("B", Some("⚠️ EAT SOON")),
                ("C", Some("(10 days left)")),
            ]
        );
    }

    #[tokio::test]
    async fn test_view_empty_states() {
        let service = test_service(date(2024, 6, 10));

        let view = service.view("").await.unwrap();
        assert_eq!(view.state, ListState::Empty);
        assert_eq!(view.message.as_deref(), Some("Fridge is empty 🕸️"));

        service.create(create_dto("Eggs", "2024-06-12")).await.unwrap();
        let view = service.view("milk").await.unwrap();
        assert_eq!(view.state, ListState::NoMatches);
        assert_eq!(view.message.as_deref(), Some("No items match your search"));
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let service = test_service(date(2024, 6, 10));
        let mut rx = service.subscribe();

        let milk = service.create(create_dto("Milk", "2024-06-12")).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().items, vec![milk.clone()]);

        service.delete(milk.id).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().items.is_empty());

        service.delete(milk.id).await.unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_refresh_snapshot_does_not_overwrite_later_create() {
        let store = Arc::new(PausingStore {
            inner: JsonRecordStore::new(Box::new(LocalStorageBlob::new(
                Arc::new(LocalStorage::new()),
                LOCAL_STORAGE_KEY,
            ))),
            armed: AtomicBool::new(true),
            read_done: Notify::new(),
            release: Notify::new(),
        });
        let service = Arc::new(ProductService::new(
            store.clone(),
            Arc::new(FixedClock(date(2024, 6, 10))),
        ));
        let rx = service.subscribe();

        let refresh = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.refresh().await }
        });
        store.read_done.notified().await;

        let create = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.create(create_dto("Milk", "2024-06-12")).await }
        });
        tokio::task::yield_now().await;
        store.release.notify_one();

        assert!(refresh.await.unwrap().unwrap().is_empty());
        let milk = create.await.unwrap().unwrap();

        assert_eq!(rx.borrow().items, vec![milk.clone()]);
        assert_eq!(service.list().await.unwrap(), vec![milk]);
    }

    #[test]
    fn test_quick_add_presets_expire_in_a_week() {
        let service = test_service(date(2024, 12, 28));

        let presets = service.quick_add_presets();

        let names: Vec<&str> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Eggs", "Cheese", "Salad"]);
        assert!(presets.iter().all(|p| p.expiry_date == "2025-01-04"));
        assert!(presets.iter().all(|p| p.category == "General"));
    }
}
