use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products)
                .post(handlers::create_product)
                .delete(handlers::delete_product),
        )
        .route("/products/view", get(handlers::get_product_view))
        .route("/products/presets", get(handlers::list_quick_add_presets))
        .route("/products/events", get(handlers::stream_product_view))
        .with_state(service)
}
