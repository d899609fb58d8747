//! List view model: filter, sort and decorate stored products for display.
//!
//! Everything here is a pure function of (products, search term, today) and
//! is recomputed from scratch whenever any of them changes.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::products::models::{ExpiryStatus, Product};

/// Which of the list's presentation states applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    /// The store holds no records at all
    Empty,
    /// The store has records but none matched the search term
    NoMatches,
    /// At least one record is visible
    Items,
}

/// A product annotated with its expiry classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedProduct<'a> {
    pub product: &'a Product,
    pub status: ExpiryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a> {
    pub state: ListState,
    pub search_term: String,
    pub total: usize,
    pub items: Vec<DecoratedProduct<'a>>,
}

/// Case-insensitive substring match; an empty term matches everything
pub fn matches_search(name: &str, search_term: &str) -> bool {
    search_term.is_empty() || name.to_lowercase().contains(&search_term.to_lowercase())
}

/// Earliest expiry first, undated records last
fn compare_expiry(a: &Product, b: &Product) -> Ordering {
    match (a.expiry_date, b.expiry_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filtered, stably sorted and decorated products.
///
/// Sorting needs the whole filtered set, decoration happens lazily as the
/// iterator is consumed.
pub fn decorate<'a>(
    products: &'a [Product],
    search_term: &str,
    today: NaiveDate,
) -> impl Iterator<Item = DecoratedProduct<'a>> + 'a {
    let mut visible: Vec<&'a Product> = products
        .iter()
        .filter(|p| matches_search(&p.name, search_term))
        .collect();
    visible.sort_by(|a, b| compare_expiry(a, b));

    visible.into_iter().map(move |product| DecoratedProduct {
        product,
        status: ExpiryStatus::classify(product.expiry_date, today),
    })
}

pub fn build_list_view<'a>(
    products: &'a [Product],
    search_term: &str,
    today: NaiveDate,
) -> ListView<'a> {
    let items: Vec<DecoratedProduct<'a>> = decorate(products, search_term, today).collect();

    let state = if products.is_empty() {
        ListState::Empty
    } else if items.is_empty() {
        ListState::NoMatches
    } else {
        ListState::Items
    };

    ListView {
        state,
        search_term: search_term.to_string(),
        total: products.len(),
        items,
    }
}
