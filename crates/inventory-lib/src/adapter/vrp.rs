//! Huawei VRP adapter
//!
//! The text-based platform. Modules come from `elabel brief` via the
//! elabel parser; controllers are assembled in two passes, one
//! skeleton controller per logical interface, then optics enrichment
//! from `optical-module brief` merged by port key; interfaces come from
//! the structured `ifm/interfaces` table.

use super::{typed_rows, PlatformAdapter, PlatformKind, RawFacts};
use crate::error::SyncError;
use crate::models::{
    CanonicalInventory, Controller, Interface, InventoryModule, RawInventoryLine,
    RawTransceiverLine,
};
use crate::parser::{parse_elabel_brief, parse_optical_module_brief};
use crate::source::DeviceSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const ELABEL_COMMAND: &str = "elabel brief";
const OPTICS_COMMAND: &str = "optical-module brief";
const INTERFACES_PATH: &str = "ifm/interfaces";

/// One row of the structured interface table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VrpInterfaceEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub admin_status: String,
    #[serde(default)]
    pub oper_status: String,
}

/// Raw facts collected from one VRP device. The CLI text is already
/// parsed into intermediates at collection time.
#[derive(Debug, Clone, Default)]
pub struct VrpFacts {
    pub elabel: Vec<RawInventoryLine>,
    pub transceivers: Vec<RawTransceiverLine>,
    pub interfaces: Vec<VrpInterfaceEntry>,
}

pub struct VrpAdapter;

#[async_trait]
impl PlatformAdapter for VrpAdapter {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Vrp
    }

    async fn collect(
        &self,
        source: &dyn DeviceSource,
        device: &str,
    ) -> Result<RawFacts, SyncError> {
        // The elabel command is the reachability probe.
        let elabel_text = source
            .run_command(device, ELABEL_COMMAND)
            .await
            .map_err(|e| SyncError::collection(device, e))?;
        let elabel = parse_elabel_brief(&elabel_text);

        let transceivers = match source.run_command(device, OPTICS_COMMAND).await {
            Ok(text) => parse_optical_module_brief(&text),
            Err(err) => {
                warn!(device, error = %err, "optical-module output unavailable");
                Vec::new()
            }
        };

        let interfaces = match source.operational_tree(device, INTERFACES_PATH).await {
            Ok(tree) => typed_rows(device, INTERFACES_PATH, tree),
            Err(err) => {
                warn!(device, error = %err, "interface table unavailable");
                Vec::new()
            }
        };

        debug!(
            device,
            modules = elabel.len(),
            transceivers = transceivers.len(),
            interfaces = interfaces.len(),
            "collected vrp facts"
        );

        Ok(RawFacts::Vrp(VrpFacts {
            elabel,
            transceivers,
            interfaces,
        }))
    }

    fn normalize(&self, device: &str, raw: &RawFacts) -> CanonicalInventory {
        let facts = match raw {
            RawFacts::Vrp(facts) => facts,
            _ => {
                warn!(device, "raw facts are not vrp shaped, nothing to normalize");
                return CanonicalInventory::default();
            }
        };

        let modules: Vec<InventoryModule> = facts
            .elabel
            .iter()
            .cloned()
            .map(InventoryModule::from)
            .collect();

        // Two-pass controller assembly, merged by port key through a
        // create-or-get map so a mistyped or unexpected key can never
        // fork a duplicate entry.
        let mut controllers: BTreeMap<String, Controller> = BTreeMap::new();

        for entry in &facts.interfaces {
            if entry.name.is_empty() {
                warn!(device, "interface row without a name, skipping");
                continue;
            }
            let id = format!("{}{}", entry.name, entry.number);
            let controller = controllers.entry(id.clone()).or_insert_with(|| Controller {
                id,
                ..Default::default()
            });
            controller.state = format!("{}/{}", entry.admin_status, entry.oper_status);
        }

        for row in &facts.transceivers {
            let controller = controllers
                .entry(row.port.clone())
                .or_insert_with(|| Controller {
                    id: row.port.clone(),
                    ..Default::default()
                });
            controller.optics_type = row.optics_type.clone();
            controller.part_number = row.vendor_part_number.clone();
        }

        let interfaces: Vec<Interface> = facts
            .interfaces
            .iter()
            .filter(|entry| !entry.name.is_empty())
            .map(|entry| Interface {
                size: entry.name.clone(),
                number: entry.number.clone(),
            })
            .collect();

        CanonicalInventory {
            modules,
            controllers: controllers.into_values().collect(),
            interfaces,
        }
    }
}
