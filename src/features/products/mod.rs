//! Fridge inventory feature.
//!
//! Tracks perishable products with an expiry date, classifies them by
//! urgency and serves a filtered, sorted list view.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/products` | List all products |
//! | POST | `/products` | Add a product |
//! | DELETE | `/products` | Delete a product by id (idempotent) |
//! | GET | `/products/view` | Filtered, sorted, decorated list |
//! | GET | `/products/presets` | Quick-add presets |
//! | GET | `/products/events` | SSE stream of list views |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod view_model;

pub use services::ProductService;
