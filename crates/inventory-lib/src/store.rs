//! Persistent inventory state and write transactions
//!
//! The store owns the durable copy of every reconciled record, the
//! managed-device registry, and the resource-pool table. All mutation
//! goes through `WriteTransaction`, a guard that stages a snapshot and
//! either applies once (consuming itself) or discards on drop. There
//! is no third exit path.
//!
//! Writers are sequential by construction: the orchestrator processes
//! devices one at a time, and the snapshot-swap commit relies on that.
//! Readers (API queries during a sync) are unrestricted.

use crate::error::StoreError;
use crate::models::{Controller, Interface, InventoryModule, Platform, ResourcePool};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Reconciled inventory of one device.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceInventory {
    /// Platform facts; `None` until the first sync reaches the device.
    pub platform: Option<Platform>,
    /// Modules keyed by `slot_id`. Upserted, never pruned.
    pub modules: BTreeMap<String, InventoryModule>,
    /// Controllers keyed by `id`. Upserted, never pruned.
    pub controllers: BTreeMap<String, Controller>,
    /// Interface list, fully replaced every sync.
    pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    /// Managed-device registry: device name to registered platform
    /// facts, maintained by the hosting system.
    registrations: BTreeMap<String, Platform>,
    /// Reconciled inventory per device.
    inventory: BTreeMap<String, DeviceInventory>,
    /// Resource pools keyed by name.
    pools: BTreeMap<String, ResourcePool>,
}

/// In-process inventory store.
#[derive(Clone)]
pub struct InventoryStore {
    state: Arc<RwLock<StoreState>>,
    transactions_opened: Arc<AtomicU64>,
    transactions_applied: Arc<AtomicU64>,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            transactions_opened: Arc::new(AtomicU64::new(0)),
            transactions_applied: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Add a device to the managed-device registry.
    pub async fn register_device(&self, name: impl Into<String>, platform: Platform) {
        let name = name.into();
        debug!(device = %name, platform = %platform.name, "registering device");
        let mut state = self.state.write().await;
        state.registrations.insert(name, platform);
    }

    /// Every device under the inventory group, in stable order.
    pub async fn device_names(&self) -> Vec<String> {
        self.state.read().await.registrations.keys().cloned().collect()
    }

    /// Registered platform facts for a device.
    pub async fn registration(&self, device: &str) -> Option<Platform> {
        self.state.read().await.registrations.get(device).cloned()
    }

    /// Reconciled inventory of a device, if any sync has reached it.
    pub async fn inventory(&self, device: &str) -> Option<DeviceInventory> {
        self.state.read().await.inventory.get(device).cloned()
    }

    /// All provisioned resource pools.
    pub async fn pools(&self) -> Vec<ResourcePool> {
        self.state.read().await.pools.values().cloned().collect()
    }

    pub async fn pool(&self, name: &str) -> Option<ResourcePool> {
        self.state.read().await.pools.get(name).cloned()
    }

    /// Number of write transactions opened since startup.
    pub fn transactions_opened(&self) -> u64 {
        self.transactions_opened.load(Ordering::Relaxed)
    }

    /// Number of write transactions applied since startup.
    pub fn transactions_applied(&self) -> u64 {
        self.transactions_applied.load(Ordering::Relaxed)
    }

    /// Open a write transaction: stage a snapshot of the current state.
    pub async fn open_write(&self, actor: &str, context: &str) -> WriteTransaction {
        self.transactions_opened.fetch_add(1, Ordering::Relaxed);
        let staged = self.state.read().await.clone();
        debug!(actor, context, "write transaction opened");
        WriteTransaction {
            store: self.clone(),
            staged,
            actor: actor.to_string(),
            context: context.to_string(),
            applied: false,
        }
    }
}

/// A staged write against the store.
///
/// Mutations touch only the staged snapshot. `apply` consumes the
/// guard and commits; dropping an unapplied guard discards every
/// staged change.
pub struct WriteTransaction {
    store: InventoryStore,
    staged: StoreState,
    actor: String,
    context: String,
    applied: bool,
}

impl WriteTransaction {
    /// Mutable access to a device's inventory entry. The device must be
    /// registered; its inventory entry is created on first write.
    pub fn device_mut(&mut self, device: &str) -> Result<&mut DeviceInventory, StoreError> {
        if !self.staged.registrations.contains_key(device) {
            return Err(StoreError::UnknownDevice(device.to_string()));
        }
        Ok(self
            .staged
            .inventory
            .entry(device.to_string())
            .or_default())
    }

    pub fn pool_exists(&self, name: &str) -> bool {
        self.staged.pools.contains_key(name)
    }

    /// Create a pool if absent. Returns whether a pool was created; an
    /// existing pool is left untouched, range included.
    pub fn create_pool(&mut self, pool: ResourcePool) -> bool {
        if self.staged.pools.contains_key(&pool.name) {
            return false;
        }
        debug!(pool = %pool.name, "pool staged for creation");
        self.staged.pools.insert(pool.name.clone(), pool);
        true
    }

    /// Commit the staged state. Apply-once is enforced by consumption.
    pub async fn apply(mut self) -> Result<(), StoreError> {
        let staged = std::mem::take(&mut self.staged);
        *self.store.state.write().await = staged;
        self.applied = true;
        self.store
            .transactions_applied
            .fetch_add(1, Ordering::Relaxed);
        debug!(actor = %self.actor, context = %self.context, "write transaction applied");
        Ok(())
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if !self.applied {
            debug!(
                actor = %self.actor,
                context = %self.context,
                "write transaction discarded without apply"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(name: &str) -> Platform {
        Platform {
            name: name.to_string(),
            version: "7.3.2".to_string(),
            model: "testbox".to_string(),
            serial_number: "SN1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_apply_commits_staged_changes() {
        let store = InventoryStore::new();
        store.register_device("r1", platform("cisco-iosxr")).await;

        let mut tx = store.open_write("admin", "test").await;
        tx.device_mut("r1").unwrap().platform = Some(platform("cisco-iosxr"));
        tx.apply().await.unwrap();

        let inventory = store.inventory("r1").await.unwrap();
        assert_eq!(inventory.platform.unwrap().name, "cisco-iosxr");
        assert_eq!(store.transactions_applied(), 1);
    }

    #[tokio::test]
    async fn test_dropped_transaction_leaves_store_unchanged() {
        let store = InventoryStore::new();
        store.register_device("r1", platform("cisco-iosxr")).await;

        {
            let mut tx = store.open_write("admin", "test").await;
            tx.device_mut("r1").unwrap().platform = Some(platform("cisco-iosxr"));
            // dropped without apply
        }

        let inventory = store.inventory("r1").await;
        assert!(inventory.is_none() || inventory.unwrap().platform.is_none());
        assert_eq!(store.transactions_opened(), 1);
        assert_eq!(store.transactions_applied(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_device_is_rejected() {
        let store = InventoryStore::new();
        let mut tx = store.open_write("admin", "test").await;
        assert!(matches!(
            tx.device_mut("ghost"),
            Err(StoreError::UnknownDevice(_))
        ));
    }

    #[tokio::test]
    async fn test_existing_pool_is_never_recreated() {
        let store = InventoryStore::new();

        let mut tx = store.open_write("admin", "pools").await;
        assert!(tx.create_pool(ResourcePool {
            name: "global-vlan".to_string(),
            range_start: 100,
            range_end: 200,
        }));
        assert!(!tx.create_pool(ResourcePool {
            name: "global-vlan".to_string(),
            range_start: 1,
            range_end: 2,
        }));
        tx.apply().await.unwrap();

        let pool = store.pool("global-vlan").await.unwrap();
        assert_eq!((pool.range_start, pool.range_end), (100, 200));
    }
}
