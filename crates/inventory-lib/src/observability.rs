//! Observability infrastructure for the sync service
//!
//! Prometheus metrics for the pipeline (sync runs, per-device
//! outcomes, pool creation) registered once in a process-global
//! registry and exposed by the service's `/metrics` endpoint.

use prometheus::{register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge};
use std::sync::OnceLock;

/// Histogram buckets for whole-run sync duration (seconds). Device
/// collection is slow network I/O, so the scale is generous.
const SYNC_DURATION_BUCKETS: &[f64] = &[
    0.05, 0.25, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 1800.0,
];

static GLOBAL_METRICS: OnceLock<SyncMetricsInner> = OnceLock::new();

struct SyncMetricsInner {
    sync_runs: IntCounter,
    sync_duration_seconds: Histogram,
    devices_processed: IntCounter,
    devices_failed: IntCounter,
    pools_created: IntCounter,
    registered_devices: IntGauge,
}

impl SyncMetricsInner {
    fn new() -> Self {
        Self {
            sync_runs: register_int_counter!(
                "inventory_sync_runs_total",
                "Total number of sync runs started"
            )
            .expect("Failed to register sync_runs_total"),

            sync_duration_seconds: register_histogram!(
                "inventory_sync_duration_seconds",
                "Wall-clock duration of whole sync runs",
                SYNC_DURATION_BUCKETS.to_vec()
            )
            .expect("Failed to register sync_duration_seconds"),

            devices_processed: register_int_counter!(
                "inventory_sync_devices_processed_total",
                "Devices fully reconciled across all sync runs"
            )
            .expect("Failed to register devices_processed_total"),

            devices_failed: register_int_counter!(
                "inventory_sync_devices_failed_total",
                "Devices skipped due to collection or reconciliation errors"
            )
            .expect("Failed to register devices_failed_total"),

            pools_created: register_int_counter!(
                "inventory_sync_pools_created_total",
                "Resource pools created by the provisioner"
            )
            .expect("Failed to register pools_created_total"),

            registered_devices: register_int_gauge!(
                "inventory_sync_registered_devices",
                "Devices currently in the managed-device registry"
            )
            .expect("Failed to register registered_devices"),
        }
    }
}

/// Lightweight handle to the process-global metrics. Clones share the
/// same underlying instruments.
#[derive(Clone)]
pub struct SyncMetrics {
    _private: (),
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SyncMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &'static SyncMetricsInner {
        GLOBAL_METRICS.get_or_init(SyncMetricsInner::new)
    }

    pub fn inc_sync_runs(&self) {
        self.inner().sync_runs.inc();
    }

    pub fn observe_sync_duration(&self, seconds: f64) {
        self.inner().sync_duration_seconds.observe(seconds);
    }

    pub fn inc_devices_processed(&self) {
        self.inner().devices_processed.inc();
    }

    pub fn inc_devices_failed(&self) {
        self.inner().devices_failed.inc();
    }

    pub fn add_pools_created(&self, count: u64) {
        self.inner().pools_created.inc_by(count);
    }

    pub fn set_registered_devices(&self, count: i64) {
        self.inner().registered_devices.set(count);
    }
}
