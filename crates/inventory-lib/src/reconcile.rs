//! Reconciliation of canonical records into the store
//!
//! One committed transaction per populate step. The granularity is
//! deliberate: a later step failing must not roll back an earlier
//! committed step, matching the per-step commit discipline of the
//! store.
//!
//! Modules and controllers are upserted by key; the interface list is
//! the one collection with full-replace semantics, because interfaces
//! renumber and stale entries must not linger.

use crate::error::SyncError;
use crate::models::{Controller, Interface, InventoryModule};
use crate::store::InventoryStore;
use tracing::{debug, info};

/// Copy the registry's platform facts into the device's inventory
/// entry. All four fields are written together; there is no partial
/// platform update.
pub async fn populate_platform(
    store: &InventoryStore,
    actor: &str,
    device: &str,
) -> Result<(), SyncError> {
    let platform = store
        .registration(device)
        .await
        .ok_or_else(|| SyncError::UnknownDevice(device.to_string()))?;

    let mut tx = store.open_write(actor, "populate-platform").await;
    tx.device_mut(device)
        .map_err(|e| SyncError::reconcile(device, e))?
        .platform = Some(platform);
    tx.apply().await.map_err(|e| SyncError::reconcile(device, e))?;

    info!(device, "platform details set");
    Ok(())
}

/// Upsert modules by `slot_id`: create if absent, otherwise overwrite
/// every field. Modules absent from `modules` are left in place.
pub async fn populate_modules(
    store: &InventoryStore,
    actor: &str,
    device: &str,
    modules: &[InventoryModule],
) -> Result<(), SyncError> {
    let mut tx = store.open_write(actor, "populate-inventory").await;
    let entry = tx
        .device_mut(device)
        .map_err(|e| SyncError::reconcile(device, e))?;

    for module in modules {
        debug!(device, module = %module.slot_id, "module upserted");
        entry.modules.insert(module.slot_id.clone(), module.clone());
    }
    tx.apply().await.map_err(|e| SyncError::reconcile(device, e))?;

    info!(device, count = modules.len(), "inventory modules populated");
    Ok(())
}

/// Upsert controllers by `id`, same discipline as modules.
pub async fn populate_controllers(
    store: &InventoryStore,
    actor: &str,
    device: &str,
    controllers: &[Controller],
) -> Result<(), SyncError> {
    let mut tx = store.open_write(actor, "populate-controllers").await;
    let entry = tx
        .device_mut(device)
        .map_err(|e| SyncError::reconcile(device, e))?;

    for controller in controllers {
        debug!(device, controller = %controller.id, "controller upserted");
        entry
            .controllers
            .insert(controller.id.clone(), controller.clone());
    }
    tx.apply().await.map_err(|e| SyncError::reconcile(device, e))?;

    info!(device, count = controllers.len(), "controllers populated");
    Ok(())
}

/// Delete the device's entire interface list and recreate it from the
/// new one, inside the same transaction.
pub async fn replace_interfaces(
    store: &InventoryStore,
    actor: &str,
    device: &str,
    interfaces: &[Interface],
) -> Result<(), SyncError> {
    let mut tx = store.open_write(actor, "populate-interfaces").await;
    let entry = tx
        .device_mut(device)
        .map_err(|e| SyncError::reconcile(device, e))?;

    entry.interfaces.clear();
    entry.interfaces.extend_from_slice(interfaces);
    tx.apply().await.map_err(|e| SyncError::reconcile(device, e))?;

    info!(device, count = interfaces.len(), "interface list replaced");
    Ok(())
}
