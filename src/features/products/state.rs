//! Explicit inventory state, advanced by pure event application.
//!
//! Presentation layers hold an [`InventoryState`], feed it events and
//! re-derive the list view; nothing mutates shared state in place.

use chrono::NaiveDate;

use crate::features::products::models::Product;
use crate::features::products::view_model::{build_list_view, ListView};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryState {
    pub items: Vec<Product>,
    pub search_term: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    /// Replace the whole collection with a fresh read of the store
    Loaded(Vec<Product>),
    Added(Product),
    Removed(i64),
    SearchChanged(String),
}

impl InventoryState {
    pub fn apply(self, event: InventoryEvent) -> InventoryState {
        match event {
            InventoryEvent::Loaded(items) => InventoryState { items, ..self },
            InventoryEvent::Added(product) => {
                let mut items = self.items;
                items.push(product);
                InventoryState { items, ..self }
            }
            InventoryEvent::Removed(id) => {
                let items = self.items.into_iter().filter(|p| p.id != id).collect();
                InventoryState { items, ..self }
            }
            InventoryEvent::SearchChanged(search_term) => InventoryState {
                search_term,
                ..self
            },
        }
    }

    pub fn view(&self, today: NaiveDate) -> ListView<'_> {
        build_list_view(&self.items, &self.search_term, today)
    }
}
