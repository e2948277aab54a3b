//! Platform adapters
//!
//! One adapter per vendor platform, each a collector + normalizer pair
//! behind a common trait. `classify_platform` maps a device's
//! registered platform name onto the closed `PlatformKind` set, and
//! `adapter_for` selects the implementation. An unrecognized platform
//! never fails dispatch; it lands on the explicit `Unknown` variant and
//! the designated default adapter.

mod ios_xr;
mod sros;
mod vrp;

#[cfg(test)]
mod tests;

pub use ios_xr::{IosXrAdapter, IosXrFacts};
pub use sros::{SrosAdapter, SrosFacts};
pub use vrp::{VrpAdapter, VrpFacts};

use crate::error::SyncError;
use crate::models::CanonicalInventory;
use crate::source::DeviceSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Deserialize the rows of an operational-state list one element at a
/// time. A malformed row is skipped with a warning; the rest of the
/// list still normalizes.
pub(crate) fn typed_rows<T: DeserializeOwned>(device: &str, path: &str, tree: Value) -> Vec<T> {
    let items = match tree {
        Value::Array(items) => items,
        other => {
            warn!(device, path, got = %other, "expected a list of rows, skipping subtree");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!(device, path, error = %err, "malformed row, skipping");
                None
            }
        })
        .collect()
}

/// The closed set of known platform identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Cisco IOS-XR: structured operational-state trees.
    IosXr,
    /// Huawei VRP: CLI text plus a structured interface table.
    Vrp,
    /// Nokia SR OS: structured card/MDA/port/LAG trees.
    Sros,
    /// Anything else; dispatches to the default adapter.
    Unknown,
}

/// Classify a device by its registered platform name.
///
/// Pure function, total over arbitrary strings: whatever the registry
/// carries, classification succeeds and unrecognized names map to
/// `Unknown`.
pub fn classify_platform(platform_name: &str) -> PlatformKind {
    let name = platform_name.to_ascii_lowercase();

    if name.contains("ios-xr") || name.contains("iosxr") {
        PlatformKind::IosXr
    } else if name.contains("vrp") || name.contains("huawei") {
        PlatformKind::Vrp
    } else if name.contains("sros") || name.contains("sr os") || name.contains("nokia") {
        PlatformKind::Sros
    } else {
        PlatformKind::Unknown
    }
}

/// Raw per-platform facts produced by `collect`, consumed by
/// `normalize`.
#[derive(Debug, Clone)]
pub enum RawFacts {
    IosXr(IosXrFacts),
    Vrp(VrpFacts),
    Sros(SrosFacts),
}

/// A platform-specific collector + normalizer pair.
///
/// `collect` delegates to the device source; its first query failing
/// marks the device unreachable. `normalize` is infallible at the
/// device level: malformed records are skipped with a warning and
/// processing continues, since raw formats drift across firmware
/// revisions.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn kind(&self) -> PlatformKind;

    async fn collect(&self, source: &dyn DeviceSource, device: &str)
        -> Result<RawFacts, SyncError>;

    fn normalize(&self, device: &str, raw: &RawFacts) -> CanonicalInventory;
}

static IOS_XR: IosXrAdapter = IosXrAdapter;
static VRP: VrpAdapter = VrpAdapter;
static SROS: SrosAdapter = SrosAdapter;

/// Select the adapter for a platform.
///
/// `Unknown` uses the SR OS adapter as the designated default.
pub fn adapter_for(kind: PlatformKind) -> &'static dyn PlatformAdapter {
    match kind {
        PlatformKind::IosXr => &IOS_XR,
        PlatformKind::Vrp => &VRP,
        PlatformKind::Sros | PlatformKind::Unknown => &SROS,
    }
}
