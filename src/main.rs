mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StorageBackendKind, StorageConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::products::store::{JsonRecordStore, RecordStore};
use crate::features::products::{routes as products_routes, ProductService};
use crate::modules::storage::{BlobBackend, FileBlob, LocalStorage, LocalStorageBlob};
use crate::shared::clock::SystemClock;
use crate::shared::constants::LOCAL_STORAGE_KEY;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Build the record store selected by configuration
fn create_record_store(config: &StorageConfig) -> Arc<dyn RecordStore> {
    let backend: Box<dyn BlobBackend> = match config.backend {
        StorageBackendKind::File => Box::new(FileBlob::new(config.data_file_path.clone())),
        StorageBackendKind::Local => Box::new(LocalStorageBlob::new(
            Arc::new(LocalStorage::new()),
            LOCAL_STORAGE_KEY,
        )),
    };
    Arc::new(JsonRecordStore::new(backend))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Initialize record store
    let store = create_record_store(&config.storage);
    tracing::info!("Record store initialized ({})", store.describe());

    // Initialize Product Service and prime its state from the store
    let product_service = Arc::new(ProductService::new(store, Arc::new(SystemClock)));
    let products = product_service
        .refresh()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load products: {}", e))?;
    tracing::info!(
        "Product service initialized with {} products",
        products.len()
    );

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(products_routes::routes(product_service))
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{date, new_product};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_create_record_store_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackendKind::File,
            data_file_path: dir.path().join("data.json"),
        };

        let store = create_record_store(&config);
        store
            .append(new_product("Milk", date(2024, 6, 12)))
            .await
            .unwrap();

        assert!(store.describe().starts_with("file:"));
        assert!(dir.path().join("data.json").exists());
    }

    #[tokio::test]
    async fn test_create_record_store_local_backend() {
        let config = StorageConfig {
            backend: StorageBackendKind::Local,
            data_file_path: PathBuf::from("unused.json"),
        };

        let store = create_record_store(&config);
        store
            .append(new_product("Milk", date(2024, 6, 12)))
            .await
            .unwrap();

        assert_eq!(store.describe(), "local-storage:fridgeItems");
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(!PathBuf::from("unused.json").exists());
    }
}
