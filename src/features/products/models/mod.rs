mod expiry;
mod product;

pub use expiry::{format_expiry_date, parse_expiry_date, ExpiryStatus, Urgency};
pub use product::{NewProduct, Product};
