//! Sync orchestration
//!
//! Drives the per-device pipeline: resolve the target set, then for
//! each device classify the platform, collect and normalize through
//! the matching adapter, and reconcile into the store. Devices are
//! processed strictly sequentially; one device failing never blocks
//! the rest. Pool provisioning runs once, after the loop, over the
//! cumulative stored interfaces of every resolved target.

#[cfg(test)]
mod tests;

use crate::adapter::{adapter_for, classify_platform};
use crate::error::SyncError;
use crate::observability::SyncMetrics;
use crate::pools::{provision_pools, PoolConfig};
use crate::reconcile::{
    populate_controllers, populate_modules, populate_platform, replace_interfaces,
};
use crate::source::DeviceSource;
use crate::store::InventoryStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Target selection for one sync run. The set is closed: an
/// unrecognized mode fails deserialization at the request boundary,
/// before any device work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Every device under the inventory group.
    All,
    /// Exactly the devices named in the request.
    Specify,
}

/// A sync request as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub target: TargetMode,
    #[serde(default)]
    pub devices: Vec<String>,
}

/// One device that could not be reconciled.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceFailure {
    pub device: String,
    pub error: String,
}

/// Outcome of one sync run. The external API contract exposes only
/// `devices_processed`; the rest feeds logs and metrics.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub devices_processed: usize,
    pub failures: Vec<DeviceFailure>,
    pub pools_created: usize,
    pub completed_at: i64,
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Actor recorded on every write transaction.
    pub actor: String,
    /// Overall time budget for one run. Once exhausted no new device
    /// starts; the in-flight device completes.
    pub deadline: Duration,
    pub pools: PoolConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            actor: "admin".to_string(),
            deadline: Duration::from_secs(1800),
            pools: PoolConfig::default(),
        }
    }
}

/// The sync orchestrator.
pub struct SyncEngine {
    store: InventoryStore,
    source: Arc<dyn DeviceSource>,
    config: SyncConfig,
    metrics: SyncMetrics,
}

impl SyncEngine {
    pub fn new(store: InventoryStore, source: Arc<dyn DeviceSource>, config: SyncConfig) -> Self {
        Self {
            store,
            source,
            config,
            metrics: SyncMetrics::new(),
        }
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Run one sync: resolve targets, reconcile each device, provision
    /// pools. Device-level failures are isolated and reported; only a
    /// provisioning commit failure fails the run itself.
    pub async fn run(&self, request: SyncRequest) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        self.metrics.inc_sync_runs();

        let targets = self.resolve_targets(&request).await;
        info!(
            mode = ?request.target,
            targets = targets.len(),
            "sync run started"
        );

        let mut processed = 0;
        let mut failures = Vec::new();

        for device in &targets {
            if started.elapsed() >= self.config.deadline {
                warn!(
                    device,
                    budget_secs = self.config.deadline.as_secs(),
                    "time budget exhausted, not starting further devices"
                );
                break;
            }

            match self.process_device(device).await {
                Ok(()) => {
                    processed += 1;
                    self.metrics.inc_devices_processed();
                }
                Err(err) => {
                    warn!(device, error = %err, "device failed, continuing with remaining devices");
                    self.metrics.inc_devices_failed();
                    failures.push(DeviceFailure {
                        device: device.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let summary =
            provision_pools(&self.store, &self.config.actor, &self.config.pools, &targets).await?;
        self.metrics.add_pools_created(summary.created as u64);

        self.metrics
            .observe_sync_duration(started.elapsed().as_secs_f64());
        info!(
            processed,
            failed = failures.len(),
            pools_created = summary.created,
            "sync run complete"
        );

        Ok(SyncReport {
            devices_processed: processed,
            failures,
            pools_created: summary.created,
            completed_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn resolve_targets(&self, request: &SyncRequest) -> Vec<String> {
        match request.target {
            TargetMode::All => self.store.device_names().await,
            TargetMode::Specify => request.devices.clone(),
        }
    }

    /// The per-device pipeline: classify, collect, normalize,
    /// reconcile. Platform identity is read once and drives adapter
    /// selection for the whole device.
    async fn process_device(&self, device: &str) -> Result<(), SyncError> {
        let registration = self
            .store
            .registration(device)
            .await
            .ok_or_else(|| SyncError::UnknownDevice(device.to_string()))?;

        let kind = classify_platform(&registration.name);
        let adapter = adapter_for(kind);
        info!(device, platform = ?kind, "processing device");

        let raw = adapter.collect(self.source.as_ref(), device).await?;
        let inventory = adapter.normalize(device, &raw);

        let actor = &self.config.actor;
        populate_platform(&self.store, actor, device).await?;
        populate_modules(&self.store, actor, device, &inventory.modules).await?;
        populate_controllers(&self.store, actor, device, &inventory.controllers).await?;
        replace_interfaces(&self.store, actor, device, &inventory.interfaces).await?;

        Ok(())
    }
}
