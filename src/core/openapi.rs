use utoipa::{Modify, OpenApi};

use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
    view_model as products_view,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Products
        products_handlers::list_products,
        products_handlers::create_product,
        products_handlers::delete_product,
        products_handlers::get_product_view,
        products_handlers::list_quick_add_presets,
        products_handlers::stream_product_view,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Products
            products_models::Product,
            products_models::Urgency,
            products_view::ListState,
            products_dtos::CreateProductDto,
            products_dtos::DeleteProductDto,
            products_dtos::DeleteProductResponseDto,
            products_dtos::ProductViewDto,
            products_dtos::ProductListViewDto,
            products_dtos::QuickAddPresetDto,
            ApiResponse<products_dtos::ProductListViewDto>,
            ApiResponse<Vec<products_dtos::QuickAddPresetDto>>,
        )
    ),
    tags(
        (name = "products", description = "Fridge inventory: products, list view and quick-add presets"),
    ),
    info(
        title = "Fridge Tracker API",
        version = "0.1.0",
        description = "Track perishable items and their expiry dates",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
