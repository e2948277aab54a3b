//! Network inventory sync service
//!
//! Hosts the reconciliation pipeline behind an HTTP API: seeds the
//! managed-device registry from configuration, then serves the sync
//! action plus inventory queries, health and metrics.

use anyhow::Result;
use inventory_lib::{
    health::{components, HealthRegistry},
    models::Platform,
    observability::SyncMetrics,
    source::FsDeviceSource,
    store::InventoryStore,
    sync::{SyncConfig, SyncEngine},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting inventory-syncd");

    let config = config::ServiceConfig::load()?;
    info!(
        devices = config.devices.len(),
        device_root = %config.device_root,
        "Service configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::STORE).await;
    health_registry.register(components::DEVICE_SOURCE).await;
    health_registry.register(components::SYNC).await;

    // Initialize metrics
    let metrics = SyncMetrics::new();

    // Seed the managed-device registry
    let store = InventoryStore::new();
    for device in &config.devices {
        store
            .register_device(
                &device.name,
                Platform {
                    name: device.platform.clone(),
                    version: device.version.clone(),
                    model: device.model.clone(),
                    serial_number: device.serial_number.clone(),
                },
            )
            .await;
    }
    metrics.set_registered_devices(config.devices.len() as i64);

    let source = Arc::new(FsDeviceSource::new(&config.device_root));
    let engine = Arc::new(SyncEngine::new(
        store.clone(),
        source,
        SyncConfig {
            actor: config.actor.clone(),
            deadline: Duration::from_secs(config.sync_deadline_secs),
            pools: config.pools.clone(),
        },
    ));

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        store,
        engine,
    ));

    // Mark service as ready after the registry is seeded
    health_registry.set_ready(true).await;

    // Start the API server
    let _api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
