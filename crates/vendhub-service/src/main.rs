//! Vendhub Service - HTTP API for vending machine inventory.
//!
//! This is the main entry point for the vendhub service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendhub_service::{create_router, AppState, ServiceConfig};
use vendhub_store::{InventoryStore, RocksBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vendhub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vendhub Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        table_name = %config.table_name,
        "Service configuration loaded"
    );

    // Initialize the RocksDB backend and the storage engine
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let backend = Arc::new(RocksBackend::open(
        &config.data_dir,
        &[config.table_name.as_str()],
    )?);
    let store = Arc::new(InventoryStore::new(backend, config.table_name.clone()));

    // Build app state
    let state = AppState::new(store, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
