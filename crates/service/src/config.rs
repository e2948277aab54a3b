//! Service configuration

use anyhow::Result;
use inventory_lib::pools::PoolConfig;
use serde::Deserialize;

/// One managed device seeded into the registry at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    /// Platform name string; classification runs on this.
    pub platform: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// API server port for the sync action and health/metrics.
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Root directory of per-device operational captures.
    #[serde(default = "default_device_root")]
    pub device_root: String,

    /// Overall time budget for one sync run, in seconds.
    #[serde(default = "default_sync_deadline")]
    pub sync_deadline_secs: u64,

    /// Actor recorded on write transactions.
    #[serde(default = "default_actor")]
    pub actor: String,

    /// Managed-device registry.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,

    /// Pool provisioning rules.
    #[serde(default)]
    pub pools: PoolConfig,
}

fn default_api_port() -> u16 {
    8080
}

fn default_device_root() -> String {
    "/var/lib/inventory-syncd/devices".to_string()
}

fn default_sync_deadline() -> u64 {
    1800
}

fn default_actor() -> String {
    "admin".to_string()
}

impl ServiceConfig {
    /// Load configuration from an optional file named by
    /// `INVSYNC_CONFIG`, overlaid with `INVSYNC_*` environment
    /// variables.
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Ok(path) = std::env::var("INVSYNC_CONFIG") {
            builder = builder.add_source(config::File::with_name(&path));
        }
        let config = builder
            .add_source(config::Environment::with_prefix("INVSYNC"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
