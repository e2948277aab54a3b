//! Cisco IOS-XR adapter
//!
//! Everything arrives as structured operational-state trees: a flat
//! inventory list, optics controllers with the transceiver vendor
//! details nested one level deeper, and one interface list per named
//! interface-size category.

use super::{typed_rows, PlatformAdapter, PlatformKind, RawFacts};
use crate::error::SyncError;
use crate::models::{CanonicalInventory, Controller, Interface, InventoryModule};
use crate::source::DeviceSource;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

const INVENTORY_PATH: &str = "inventory";
const OPTICS_PATH: &str = "controllers/optics";

/// Interface-size categories collected per device. Each category is a
/// separate operational list of interface numbers.
const INTERFACE_CATEGORIES: &[&str] = &[
    "GigabitEthernet",
    "TenGigE",
    "TwentyFiveGigE",
    "FortyGigE",
    "HundredGigE",
    "Bundle-Ether",
    "Loopback",
];

/// One row of the inventory list, in wire field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IosXrInventoryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub descr: String,
    #[serde(default)]
    pub pid: String,
    #[serde(default)]
    pub sn: String,
}

/// One optics controller; the vendor details live under `instance`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IosXrOpticsEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub instance: IosXrOpticsInstance,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IosXrOpticsInstance {
    #[serde(default)]
    pub controller_state: String,
    #[serde(default)]
    pub transceiver_vendor_details: IosXrTransceiverDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IosXrTransceiverDetails {
    #[serde(default)]
    pub optics_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub pid: String,
}

/// Raw facts collected from one IOS-XR device.
#[derive(Debug, Clone, Default)]
pub struct IosXrFacts {
    pub inventory: Vec<IosXrInventoryEntry>,
    pub optics: Vec<IosXrOpticsEntry>,
    /// One `(category, numbers)` pair per interface-size category.
    pub interfaces: Vec<(String, Vec<String>)>,
}

pub struct IosXrAdapter;

#[async_trait]
impl PlatformAdapter for IosXrAdapter {
    fn kind(&self) -> PlatformKind {
        PlatformKind::IosXr
    }

    async fn collect(
        &self,
        source: &dyn DeviceSource,
        device: &str,
    ) -> Result<RawFacts, SyncError> {
        // The inventory tree is the reachability probe: if it is
        // missing the whole device is skipped.
        let inventory_tree = source
            .operational_tree(device, INVENTORY_PATH)
            .await
            .map_err(|e| SyncError::collection(device, e))?;
        let inventory = typed_rows(device, INVENTORY_PATH, inventory_tree);

        let optics_tree = source
            .operational_tree(device, OPTICS_PATH)
            .await
            .map_err(|e| SyncError::collection(device, e))?;
        let optics = typed_rows(device, OPTICS_PATH, optics_tree);

        // A category with no configured interfaces has no subtree on
        // the device, so per-category misses degrade to empty.
        let mut interfaces = Vec::new();
        for category in INTERFACE_CATEGORIES {
            let path = format!("interfaces/{}", category);
            match source.operational_tree(device, &path).await {
                Ok(tree) => {
                    let numbers: Vec<String> = typed_rows(device, &path, tree);
                    interfaces.push((category.to_string(), numbers));
                }
                Err(err) => {
                    debug!(device, category, error = %err, "interface category not present");
                }
            }
        }

        debug!(
            device,
            inventory = inventory.len(),
            optics = optics.len(),
            "collected ios-xr facts"
        );

        Ok(RawFacts::IosXr(IosXrFacts {
            inventory,
            optics,
            interfaces,
        }))
    }

    fn normalize(&self, device: &str, raw: &RawFacts) -> CanonicalInventory {
        let facts = match raw {
            RawFacts::IosXr(facts) => facts,
            _ => {
                warn!(device, "raw facts are not ios-xr shaped, nothing to normalize");
                return CanonicalInventory::default();
            }
        };

        let modules: Vec<InventoryModule> = facts
            .inventory
            .iter()
            .filter(|entry| {
                if entry.name.is_empty() {
                    warn!(device, "inventory row without a name, skipping");
                }
                !entry.name.is_empty()
            })
            .map(|entry| InventoryModule {
                slot_id: entry.name.clone(),
                description: entry.descr.clone(),
                product_id: entry.pid.clone(),
                serial_number: entry.sn.clone(),
            })
            .collect();

        // Vendor details are nested under instance; flatten them into
        // the canonical controller.
        let controllers: Vec<Controller> = facts
            .optics
            .iter()
            .filter(|entry| {
                if entry.id.is_empty() {
                    warn!(device, "optics row without an id, skipping");
                }
                !entry.id.is_empty()
            })
            .map(|entry| {
                let details = &entry.instance.transceiver_vendor_details;
                Controller {
                    id: entry.id.clone(),
                    state: entry.instance.controller_state.clone(),
                    optics_type: details.optics_type.clone(),
                    name: details.name.clone(),
                    part_number: details.part_number.clone(),
                    serial_number: details.serial_number.clone(),
                    product_id: details.pid.clone(),
                }
            })
            .collect();

        let interfaces: Vec<Interface> = facts
            .interfaces
            .iter()
            .flat_map(|(category, numbers)| {
                numbers.iter().map(move |number| Interface {
                    size: category.clone(),
                    number: number.clone(),
                })
            })
            .collect();

        CanonicalInventory {
            modules,
            controllers,
            interfaces,
        }
    }
}
