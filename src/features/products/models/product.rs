use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::expiry::{format_expiry_date, parse_expiry_date};

/// Stored item record
///
/// This is also the wire shape of the `/products` collection endpoint.
/// Whatever a stored document carries beyond the known fields, and an
/// `expiryDate` that does not parse, is kept in [`Preserved`] and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", from = "StoredProduct", into = "StoredProduct")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[schema(value_type = Option<String>, format = Date, example = "2024-06-12")]
    pub expiry_date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(skip)]
    pub preserved: Preserved,
}

/// Stored values the record does not model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preserved {
    /// Raw `expiryDate` when present but not a readable date
    expiry_date: Option<Value>,
    /// Unknown fields, by name
    fields: Map<String, Value>,
}

/// On-disk layout of a [`Product`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProduct {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    expiry_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// `Some` for any value present in the document, `null` included
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<StoredProduct> for Product {
    fn from(stored: StoredProduct) -> Self {
        let expiry_date = stored
            .expiry_date
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_expiry_date);
        let raw_expiry_date = match expiry_date {
            Some(_) => None,
            None => stored.expiry_date,
        };

        Product {
            id: stored.id,
            name: stored.name,
            expiry_date,
            category: stored.category,
            preserved: Preserved {
                expiry_date: raw_expiry_date,
                fields: stored.extra,
            },
        }
    }
}

impl From<Product> for StoredProduct {
    fn from(product: Product) -> Self {
        let expiry_date = product
            .expiry_date
            .map(|date| Value::String(format_expiry_date(date)))
            .or(product.preserved.expiry_date);

        StoredProduct {
            id: product.id,
            name: product.name,
            expiry_date,
            category: product.category,
            extra: product.preserved.fields,
        }
    }
}

/// Validated input for a new record, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub expiry_date: NaiveDate,
    pub category: Option<String>,
}

impl NewProduct {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            expiry_date: Some(self.expiry_date),
            category: self.category,
            preserved: Preserved::default(),
        }
    }
}
