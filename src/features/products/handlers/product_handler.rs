use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    Json,
};
use futures::Stream;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::products::dtos::{
    CreateProductDto, DeleteProductDto, DeleteProductResponseDto, ProductListViewDto,
    ProductViewQuery, QuickAddPresetDto,
};
use crate::features::products::models::Product;
use crate::features::products::services::ProductService;
use crate::features::products::state::InventoryEvent;
use crate::shared::types::{ApiResponse, Meta};

/// List all products
///
/// Returns the raw collection, order unspecified.
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All stored products", body = Vec<Product>),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
) -> Result<Json<Vec<Product>>> {
    let products = service.list().await?;
    Ok(Json(products))
}

/// Add a product
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductDto,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Validation error")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<Json<Product>> {
    dto.validate().map_err(AppError::from_validation)?;

    let product = service.create(dto).await?;
    Ok(Json(product))
}

/// Delete a product by id
///
/// Succeeds whether or not the id exists.
#[utoipa::path(
    delete,
    path = "/products",
    request_body = DeleteProductDto,
    responses(
        (status = 200, description = "Product deleted (or was already absent)", body = DeleteProductResponseDto),
        (status = 400, description = "Malformed body")
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<DeleteProductDto>,
) -> Result<Json<DeleteProductResponseDto>> {
    service.delete(dto.id).await?;
    Ok(Json(DeleteProductResponseDto { success: true }))
}

/// Get the list view
///
/// Products filtered by `search`, sorted by expiry date and decorated with
/// their urgency. `meta.total` is the size of the whole store.
#[utoipa::path(
    get,
    path = "/products/view",
    params(ProductViewQuery),
    responses(
        (status = 200, description = "Decorated product list", body = ApiResponse<ProductListViewDto>),
    ),
    tag = "products"
)]
pub async fn get_product_view(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<ProductViewQuery>,
) -> Result<Json<ApiResponse<ProductListViewDto>>> {
    let view = service.view(&query.search).await?;
    let message = view.message.clone();
    let meta = Meta { total: view.total };

    Ok(Json(ApiResponse::success(Some(view), message, Some(meta))))
}

/// List quick-add presets
#[utoipa::path(
    get,
    path = "/products/presets",
    responses(
        (status = 200, description = "Quick-add presets", body = ApiResponse<Vec<QuickAddPresetDto>>),
    ),
    tag = "products"
)]
pub async fn list_quick_add_presets(
    State(service): State<Arc<ProductService>>,
) -> Json<ApiResponse<Vec<QuickAddPresetDto>>> {
    Json(ApiResponse::success(
        Some(service.quick_add_presets()),
        None,
        None,
    ))
}

/// Stream list view updates
///
/// Sends a `view` event with the current list on connect and another one
/// after every change to the collection.
#[utoipa::path(
    get,
    path = "/products/events",
    params(ProductViewQuery),
    responses(
        (status = 200, description = "SSE stream of list views", content_type = "text/event-stream"),
    ),
    tag = "products"
)]
pub async fn stream_product_view(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<ProductViewQuery>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    // Make sure the first snapshot reflects the store, not a stale cache
    service.refresh().await?;

    let search_term = query.search;
    let stream = WatchStream::new(service.subscribe()).map(move |state| {
        let today = service.today();
        let state = state.apply(InventoryEvent::SearchChanged(search_term.clone()));
        let view: ProductListViewDto = state.view(today).into();

        let event = Event::default()
            .event("view")
            .json_data(&view)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to encode list view event: {}", e);
                Event::default().event("error").data("encoding failed")
            });

        Ok::<_, Infallible>(event)
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}
