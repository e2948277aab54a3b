//! Canonical data model for device inventory
//!
//! Every platform adapter normalizes into these vendor-neutral shapes.
//! The store persists `Platform`, `InventoryModule`, `Controller`,
//! `Interface` and `ResourcePool`; the `Raw*` types are parser
//! intermediates that never leave the pipeline invocation.

use serde::{Deserialize, Serialize};

/// Platform facts for a device: always written as a whole, never
/// partially updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub version: String,
    pub model: String,
    pub serial_number: String,
}

/// A physical or logical module (chassis slot, line card, power/fan
/// unit, sub-board).
///
/// `slot_id` uniquely identifies the module within a device and encodes
/// hierarchy with a `/` delimiter (`"LPU1"`, child `"LPU1/0"` = child 0
/// of slot 1). Modules are upserted per sync run and never deleted
/// automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryModule {
    pub slot_id: String,
    pub description: String,
    pub product_id: String,
    pub serial_number: String,
}

/// An optical/port-level entity keyed by port or optics id.
///
/// Fields are sparse by platform: the text-based platform never
/// populates `name`, `serial_number` or `product_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controller {
    pub id: String,
    pub state: String,
    pub optics_type: String,
    pub name: String,
    pub part_number: String,
    pub serial_number: String,
    pub product_id: String,
}

/// A logical or physical network interface.
///
/// `size` is the interface kind/category (`"GigabitEthernet"`,
/// `"port"`, `"lag"`, `"Eth_Trunk"`). The interface list of a device is
/// fully replaced every sync run, since interfaces renumber and stale
/// entries must not linger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub size: String,
    pub number: String,
}

/// A named numeric range reserved for later ID allocation by an
/// external allocator. Created once; the range is never modified after
/// creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub name: String,
    pub range_start: u32,
    pub range_end: u32,
}

/// One parsed line of `elabel brief` output. Parser intermediate, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInventoryLine {
    /// Composed module key (`"LPU1"`, `"LPU1/0"`).
    pub slot_id: String,
    pub product_id: String,
    pub serial_number: String,
    pub description: String,
}

/// One parsed row of `optical-module brief` output. Parser
/// intermediate, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransceiverLine {
    pub port: String,
    pub status: String,
    pub optics_type: String,
    pub vendor_part_number: String,
}

/// Normalized output of one adapter run: the canonical records for a
/// single device, owned by the pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct CanonicalInventory {
    pub modules: Vec<InventoryModule>,
    pub controllers: Vec<Controller>,
    pub interfaces: Vec<Interface>,
}

impl From<RawInventoryLine> for InventoryModule {
    fn from(line: RawInventoryLine) -> Self {
        Self {
            slot_id: line.slot_id,
            description: line.description,
            product_id: line.product_id,
            serial_number: line.serial_number,
        }
    }
}
