//! HTTP API: the sync action, inventory queries, health and metrics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inventory_lib::{
    health::{ComponentHealth, ComponentStatus, HealthRegistry},
    store::InventoryStore,
    sync::{SyncEngine, SyncRequest},
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub store: InventoryStore,
    pub engine: Arc<SyncEngine>,
}

impl AppState {
    pub fn new(health_registry: HealthRegistry, store: InventoryStore, engine: Arc<SyncEngine>) -> Self {
        Self {
            health_registry,
            store,
            engine,
        }
    }
}

/// External contract of the sync action: the processed-device count.
#[derive(Debug, Serialize)]
struct SyncResponse {
    devices_processed: usize,
}

#[derive(Debug, Serialize)]
struct DeviceSummary {
    device: String,
    platform: Option<String>,
    modules: usize,
    controllers: usize,
    interfaces: usize,
}

/// Health check - 200 while operational, 503 once unhealthy.
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check - 200 once the registry is seeded.
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint.
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %err, "failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// The sync action. An unrecognized target mode is rejected by request
/// deserialization before any device work starts.
async fn sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> impl IntoResponse {
    match state.engine.run(request).await {
        Ok(report) => {
            let health = if report.failures.is_empty() {
                ComponentHealth::healthy()
            } else {
                ComponentHealth::degraded(format!("{} device(s) failed", report.failures.len()))
            };
            state
                .health_registry
                .set(inventory_lib::health::components::SYNC, health)
                .await;

            info!(processed = report.devices_processed, "sync action complete");
            (
                StatusCode::OK,
                Json(SyncResponse {
                    devices_processed: report.devices_processed,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "sync action failed");
            state
                .health_registry
                .set(
                    inventory_lib::health::components::SYNC,
                    ComponentHealth::unhealthy(err.to_string()),
                )
                .await;
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Summaries of every registered device.
async fn list_inventory(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut summaries = Vec::new();
    for device in state.store.device_names().await {
        let inventory = state.store.inventory(&device).await.unwrap_or_default();
        summaries.push(DeviceSummary {
            device,
            platform: inventory.platform.map(|p| p.name),
            modules: inventory.modules.len(),
            controllers: inventory.controllers.len(),
            interfaces: inventory.interfaces.len(),
        });
    }
    Json(summaries)
}

/// Full reconciled inventory of one device.
async fn get_inventory(
    State(state): State<Arc<AppState>>,
    Path(device): Path<String>,
) -> impl IntoResponse {
    match state.store.inventory(&device).await {
        Some(inventory) => Json(inventory).into_response(),
        None => (StatusCode::NOT_FOUND, "no inventory for device").into_response(),
    }
}

/// All provisioned resource pools.
async fn list_pools(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.pools().await)
}

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/sync", post(sync))
        .route("/inventory", get(list_inventory))
        .route("/inventory/:device", get(get_inventory))
        .route("/pools", get(list_pools))
        .with_state(state)
}

/// Start the API server.
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
