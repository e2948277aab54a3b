//! Error taxonomy for the sync pipeline
//!
//! Collection errors isolate a single device; store errors abort the
//! remaining populate steps for that device only. Parse problems are
//! not errors at all: parsers and normalizers skip the affected record
//! and continue, because the text formats are not stable across
//! firmware revisions.

use thiserror::Error;

/// Errors raised by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The device is not present in the managed-device registry.
    #[error("device {0} is not registered")]
    UnknownDevice(String),

    /// The transaction could not be applied.
    #[error("transaction apply failed: {0}")]
    ApplyFailed(String),
}

/// Device-level pipeline errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The device could not be reached or a required operational path
    /// was missing. Isolated to the device; remaining devices continue.
    #[error("collection failed for {device}: {cause}")]
    Collection {
        device: String,
        cause: anyhow::Error,
    },

    /// A store transaction failed while reconciling the device. Aborts
    /// the remaining populate steps for that device.
    #[error("reconciliation failed for {device}: {source}")]
    Reconcile {
        device: String,
        #[source]
        source: StoreError,
    },

    /// The device is not registered, so no platform can be classified.
    #[error("device {0} is not registered")]
    UnknownDevice(String),

    /// Pool provisioning could not commit.
    #[error("pool provisioning failed: {0}")]
    Provision(#[source] StoreError),
}

impl SyncError {
    pub fn collection(device: &str, cause: anyhow::Error) -> Self {
        Self::Collection {
            device: device.to_string(),
            cause,
        }
    }

    pub fn reconcile(device: &str, source: StoreError) -> Self {
        Self::Reconcile {
            device: device.to_string(),
            source,
        }
    }
}
