//! Nokia SR OS adapter
//!
//! Modules come from two independent sources with different key
//! composition rules, a flat card list keyed `card_id` and a nested
//! slot/MDA list keyed `slot_id/mda_id`, merged into one module set.
//! Ports embed their transceiver block inline, and the interface list
//! combines physical ports and link-aggregation groups.
//!
//! This adapter is also the designated default for unclassified
//! platforms.

use super::{typed_rows, PlatformAdapter, PlatformKind, RawFacts};
use crate::error::SyncError;
use crate::models::{CanonicalInventory, Controller, Interface, InventoryModule};
use crate::source::DeviceSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const CARDS_PATH: &str = "state/cards";
const SLOTS_PATH: &str = "state/slots";
const PORTS_PATH: &str = "state/ports";
const LAGS_PATH: &str = "state/lags";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrosCard {
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub equipped_type: String,
    #[serde(default)]
    pub serial_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrosSlot {
    #[serde(default)]
    pub slot_id: String,
    #[serde(default)]
    pub mdas: Vec<SrosMda>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrosMda {
    #[serde(default)]
    pub mda_id: String,
    #[serde(default)]
    pub equipped_type: String,
    #[serde(default)]
    pub serial_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrosPort {
    #[serde(default)]
    pub port_id: String,
    #[serde(default)]
    pub oper_state: String,
    /// Inline transceiver block; absent on copper or empty cages.
    #[serde(default)]
    pub transceiver: Option<SrosTransceiver>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrosTransceiver {
    #[serde(default)]
    pub optics_type: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub model_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrosLag {
    #[serde(default)]
    pub lag_id: String,
}

/// Raw facts collected from one SR OS device.
#[derive(Debug, Clone, Default)]
pub struct SrosFacts {
    pub cards: Vec<SrosCard>,
    pub slots: Vec<SrosSlot>,
    pub ports: Vec<SrosPort>,
    pub lags: Vec<SrosLag>,
}

pub struct SrosAdapter;

#[async_trait]
impl PlatformAdapter for SrosAdapter {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Sros
    }

    async fn collect(
        &self,
        source: &dyn DeviceSource,
        device: &str,
    ) -> Result<RawFacts, SyncError> {
        // The card list is the reachability probe.
        let cards_tree = source
            .operational_tree(device, CARDS_PATH)
            .await
            .map_err(|e| SyncError::collection(device, e))?;
        let cards = typed_rows(device, CARDS_PATH, cards_tree);

        let mut facts = SrosFacts {
            cards,
            ..Default::default()
        };

        match source.operational_tree(device, SLOTS_PATH).await {
            Ok(tree) => facts.slots = typed_rows(device, SLOTS_PATH, tree),
            Err(err) => warn!(device, error = %err, "slot list unavailable"),
        }
        match source.operational_tree(device, PORTS_PATH).await {
            Ok(tree) => facts.ports = typed_rows(device, PORTS_PATH, tree),
            Err(err) => warn!(device, error = %err, "port list unavailable"),
        }
        match source.operational_tree(device, LAGS_PATH).await {
            Ok(tree) => facts.lags = typed_rows(device, LAGS_PATH, tree),
            Err(err) => warn!(device, error = %err, "lag list unavailable"),
        }

        debug!(
            device,
            cards = facts.cards.len(),
            slots = facts.slots.len(),
            ports = facts.ports.len(),
            lags = facts.lags.len(),
            "collected sr os facts"
        );

        Ok(RawFacts::Sros(facts))
    }

    fn normalize(&self, device: &str, raw: &RawFacts) -> CanonicalInventory {
        let facts = match raw {
            RawFacts::Sros(facts) => facts,
            _ => {
                warn!(device, "raw facts are not sr os shaped, nothing to normalize");
                return CanonicalInventory::default();
            }
        };

        // Cards and slot/MDA boards use different key composition
        // rules; merging through one keyed map keeps the module set
        // free of duplicates.
        let mut modules: BTreeMap<String, InventoryModule> = BTreeMap::new();

        for card in &facts.cards {
            if card.card_id.is_empty() {
                warn!(device, "card row without an id, skipping");
                continue;
            }
            modules.insert(
                card.card_id.clone(),
                InventoryModule {
                    slot_id: card.card_id.clone(),
                    description: card.equipped_type.clone(),
                    product_id: card.equipped_type.clone(),
                    serial_number: card.serial_number.clone(),
                },
            );
        }

        for slot in &facts.slots {
            if slot.slot_id.is_empty() {
                warn!(device, "slot row without an id, skipping");
                continue;
            }
            for mda in &slot.mdas {
                let slot_id = format!("{}/{}", slot.slot_id, mda.mda_id);
                modules.insert(
                    slot_id.clone(),
                    InventoryModule {
                        slot_id,
                        description: mda.equipped_type.clone(),
                        product_id: mda.equipped_type.clone(),
                        serial_number: mda.serial_number.clone(),
                    },
                );
            }
        }

        // Ports carry their transceiver inline, so one pass is enough.
        let controllers: Vec<Controller> = facts
            .ports
            .iter()
            .filter(|port| {
                if port.port_id.is_empty() {
                    warn!(device, "port row without an id, skipping");
                }
                !port.port_id.is_empty()
            })
            .map(|port| {
                let mut controller = Controller {
                    id: port.port_id.clone(),
                    state: port.oper_state.clone(),
                    ..Default::default()
                };
                if let Some(transceiver) = &port.transceiver {
                    controller.optics_type = transceiver.optics_type.clone();
                    controller.part_number = transceiver.part_number.clone();
                    controller.serial_number = transceiver.serial_number.clone();
                    controller.product_id = transceiver.model_number.clone();
                }
                controller
            })
            .collect();

        let mut interfaces: Vec<Interface> = facts
            .ports
            .iter()
            .filter(|port| !port.port_id.is_empty())
            .map(|port| Interface {
                size: "port".to_string(),
                number: port.port_id.clone(),
            })
            .collect();
        interfaces.extend(
            facts
                .lags
                .iter()
                .filter(|lag| !lag.lag_id.is_empty())
                .map(|lag| Interface {
                    size: "lag".to_string(),
                    number: lag.lag_id.clone(),
                }),
        );

        CanonicalInventory {
            modules: modules.into_values().collect(),
            controllers,
            interfaces,
        }
    }
}
