#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use chrono::NaiveDate;

#[cfg(test)]
use crate::features::products::{
    dtos::CreateProductDto,
    models::{NewProduct, Product},
    store::JsonRecordStore,
    ProductService,
};
#[cfg(test)]
use crate::modules::storage::{LocalStorage, LocalStorageBlob};
#[cfg(test)]
use crate::shared::{clock::FixedClock, constants::LOCAL_STORAGE_KEY};

#[cfg(test)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
pub fn product(id: i64, name: &str, expiry_date: NaiveDate) -> Product {
    new_product(name, expiry_date).into_product(id)
}

#[cfg(test)]
pub fn undated_product(id: i64, name: &str) -> Product {
    let mut product = product(id, name, date(2024, 1, 1));
    product.expiry_date = None;
    product
}

#[cfg(test)]
pub fn new_product(name: &str, expiry_date: NaiveDate) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        expiry_date,
        category: None,
    }
}

#[cfg(test)]
pub fn create_dto(name: &str, expiry_date: &str) -> CreateProductDto {
    CreateProductDto {
        name: Some(name.to_string()),
        expiry_date: Some(expiry_date.to_string()),
        category: None,
    }
}

/// Product service over an in-memory local storage, pinned to `today`
#[cfg(test)]
pub fn test_service(today: NaiveDate) -> Arc<ProductService> {
    let storage = Arc::new(LocalStorage::new());
    let store = JsonRecordStore::new(Box::new(LocalStorageBlob::new(storage, LOCAL_STORAGE_KEY)));
    Arc::new(ProductService::new(
        Arc::new(store),
        Arc::new(FixedClock(today)),
    ))
}
