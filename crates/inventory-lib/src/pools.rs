//! Resource pool provisioning
//!
//! Pools are named numeric ranges handed to an external ID allocator.
//! Provisioning is pure idempotence: create a pool if its name is
//! absent, never touch an existing pool's range. Pool definitions are
//! explicit configuration passed in by the caller, not process-wide
//! state.

use crate::error::SyncError;
use crate::models::ResourcePool;
use crate::store::InventoryStore;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// One configured global pool.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSpec {
    pub name: String,
    pub range_start: u32,
    pub range_end: u32,
}

/// Pool provisioning configuration: the fixed global pool set plus the
/// naming and range rules for generated per-device and per-interface
/// pools.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_global_pools")]
    pub global: Vec<PoolSpec>,
    #[serde(default = "default_device_suffix")]
    pub device_suffix: String,
    #[serde(default = "default_device_range")]
    pub device_range: (u32, u32),
    #[serde(default = "default_interface_suffix")]
    pub interface_suffix: String,
    #[serde(default = "default_interface_range")]
    pub interface_range: (u32, u32),
}

fn default_global_pools() -> Vec<PoolSpec> {
    vec![
        PoolSpec {
            name: "global-vlan-id".to_string(),
            range_start: 2,
            range_end: 4094,
        },
        PoolSpec {
            name: "global-route-distinguisher".to_string(),
            range_start: 1,
            range_end: 65535,
        },
    ]
}

fn default_device_suffix() -> String {
    "-port-id".to_string()
}

fn default_device_range() -> (u32, u32) {
    (1, 4096)
}

fn default_interface_suffix() -> String {
    "-subinterface-id".to_string()
}

fn default_interface_range() -> (u32, u32) {
    (1, 1000)
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            global: default_global_pools(),
            device_suffix: default_device_suffix(),
            device_range: default_device_range(),
            interface_suffix: default_interface_suffix(),
            interface_range: default_interface_range(),
        }
    }
}

/// Outcome of one provisioning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub created: usize,
    pub existing: usize,
}

/// Ensure every pool exists: the fixed global set, one per target
/// device, and one per stored (device, interface) pair.
///
/// Interface pools derive from the cumulative reconciled interface
/// lists in the store, not from any single run's output. A write
/// transaction is opened only when at least one pool is missing, so a
/// fully-provisioned store sees no write at all. Running twice yields
/// the same final pool state as running once.
pub async fn provision_pools(
    store: &InventoryStore,
    actor: &str,
    config: &PoolConfig,
    devices: &[String],
) -> Result<ProvisionSummary, SyncError> {
    let mut desired: Vec<ResourcePool> = config
        .global
        .iter()
        .map(|spec| ResourcePool {
            name: spec.name.clone(),
            range_start: spec.range_start,
            range_end: spec.range_end,
        })
        .collect();

    for device in devices {
        if store.registration(device).await.is_none() {
            warn!(device, "skipping pools for unregistered device");
            continue;
        }

        desired.push(ResourcePool {
            name: format!("{}{}", device, config.device_suffix),
            range_start: config.device_range.0,
            range_end: config.device_range.1,
        });

        let Some(inventory) = store.inventory(device).await else {
            continue;
        };
        for interface in &inventory.interfaces {
            desired.push(ResourcePool {
                name: format!(
                    "{}-{}{}{}",
                    device, interface.size, interface.number, config.interface_suffix
                ),
                range_start: config.interface_range.0,
                range_end: config.interface_range.1,
            });
        }
    }

    let existing_names: BTreeSet<String> =
        store.pools().await.into_iter().map(|p| p.name).collect();
    let missing: Vec<ResourcePool> = desired
        .into_iter()
        .filter(|pool| !existing_names.contains(&pool.name))
        .collect();

    let existing = existing_names.len();
    if missing.is_empty() {
        debug!("all pools present, nothing to provision");
        return Ok(ProvisionSummary { created: 0, existing });
    }

    let mut tx = store.open_write(actor, "provision-pools").await;
    let mut created = 0;
    for pool in missing {
        if tx.create_pool(pool) {
            created += 1;
        }
    }
    tx.apply().await.map_err(SyncError::Provision)?;

    info!(created, "resource pools provisioned");
    Ok(ProvisionSummary { created, existing })
}
