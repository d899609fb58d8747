use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::products::models::{format_expiry_date, parse_expiry_date, Urgency};
use crate::features::products::view_model::{DecoratedProduct, ListState, ListView};
use crate::shared::constants::{MESSAGE_NO_MATCHES, MESSAGE_STORE_EMPTY};
use crate::shared::validation::ISO_DATE_REGEX;

/// Request DTO for adding a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    /// Product name (required)
    #[validate(
        required(message = "Name is required"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    #[schema(example = "Milk")]
    pub name: Option<String>,

    /// Expiry date as `YYYY-MM-DD` (required)
    #[validate(
        required(message = "Expiry date is required"),
        custom(function = "validate_expiry_date")
    )]
    #[schema(example = "2024-06-12")]
    pub expiry_date: Option<String>,

    /// Optional free-text category
    pub category: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_expiry_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Expiry date is required")));
    }
    if !ISO_DATE_REGEX.is_match(value) || parse_expiry_date(value).is_none() {
        return Err(ValidationError::new("date")
            .with_message(Cow::Borrowed("Expiry date must be a valid YYYY-MM-DD date")));
    }
    Ok(())
}

/// Request DTO for deleting a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteProductDto {
    pub id: i64,
}

/// Response DTO for delete, returned whether or not the id existed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteProductResponseDto {
    pub success: bool,
}

/// Query params for the list view
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductViewQuery {
    /// Case-insensitive substring matched against product names
    #[serde(default)]
    pub search: String,
}

/// A product decorated for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewDto {
    pub id: i64,
    pub name: String,
    pub expiry_date: Option<String>,
    pub category: Option<String>,
    /// expired, soon, ok or unknown
    #[schema(example = "soon")]
    pub status: String,
    /// Absent when the product has no expiry date
    pub urgency: Option<Urgency>,
    pub days_remaining: Option<i64>,
    #[schema(example = "⚠️ EAT SOON")]
    pub label: Option<String>,
}

impl From<DecoratedProduct<'_>> for ProductViewDto {
    fn from(d: DecoratedProduct<'_>) -> Self {
        Self {
            id: d.product.id,
            name: d.product.name.clone(),
            expiry_date: d.product.expiry_date.map(format_expiry_date),
            category: d.product.category.clone(),
            status: d.status.key().to_string(),
            urgency: d.status.urgency(),
            days_remaining: d.status.days_remaining(),
            label: d.status.label(),
        }
    }
}

/// Filtered, sorted and decorated product list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListViewDto {
    pub state: ListState,
    /// User-facing message for the empty states
    pub message: Option<String>,
    pub search_term: String,
    /// Number of products in the store, before filtering
    pub total: i64,
    pub items: Vec<ProductViewDto>,
}

impl From<ListView<'_>> for ProductListViewDto {
    fn from(view: ListView<'_>) -> Self {
        let message = match view.state {
            ListState::Empty => Some(MESSAGE_STORE_EMPTY.to_string()),
            ListState::NoMatches => Some(MESSAGE_NO_MATCHES.to_string()),
            ListState::Items => None,
        };

        Self {
            state: view.state,
            message,
            search_term: view.search_term,
            total: view.total as i64,
            items: view.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Quick-add preset used to prefill the add form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickAddPresetDto {
    #[schema(example = "🥛")]
    pub icon: String,
    #[schema(example = "Milk")]
    pub name: String,
    pub expiry_date: String,
    pub category: String,
}
