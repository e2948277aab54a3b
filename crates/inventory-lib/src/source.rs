//! Raw operational-data access
//!
//! The pipeline never contacts devices itself; it goes through the
//! `DeviceSource` trait. Structured platforms expose operational-state
//! trees addressed by path, the text platform additionally answers exec
//! commands with raw CLI output.
//!
//! `FsDeviceSource` is the shipped implementation: it serves captures
//! from a per-device directory, which backs lab/dry-run deployments and
//! every test. A network transport drops in behind the same trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Access to a device's raw operational data.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// Fetch a structured operational-state subtree.
    async fn operational_tree(&self, device: &str, path: &str) -> Result<Value>;

    /// Run an exec command and return its raw text output.
    async fn run_command(&self, device: &str, command: &str) -> Result<String>;
}

/// Filesystem-backed device source.
///
/// Layout: `<root>/<device>/<sanitized path>.json` for operational
/// trees and `<root>/<device>/<sanitized command>.txt` for command
/// captures, where `/` and spaces in the path or command become `_`.
pub struct FsDeviceSource {
    root: PathBuf,
}

impl FsDeviceSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| if c == '/' || c == ' ' { '_' } else { c })
            .collect()
    }

    fn capture_path(&self, device: &str, name: &str, ext: &str) -> PathBuf {
        self.root
            .join(device)
            .join(format!("{}.{}", Self::sanitize(name), ext))
    }
}

#[async_trait]
impl DeviceSource for FsDeviceSource {
    async fn operational_tree(&self, device: &str, path: &str) -> Result<Value> {
        let file = self.capture_path(device, path, "json");
        debug!(device, path, file = %file.display(), "reading operational tree");

        let content = fs::read_to_string(&file)
            .await
            .with_context(|| format!("operational path {} not present for {}", path, device))?;

        serde_json::from_str(&content)
            .with_context(|| format!("malformed operational tree {} for {}", path, device))
    }

    async fn run_command(&self, device: &str, command: &str) -> Result<String> {
        let file = self.capture_path(device, command, "txt");
        debug!(device, command, file = %file.display(), "reading command capture");

        fs::read_to_string(&file)
            .await
            .with_context(|| format!("command {:?} not available for {}", command, device))
    }
}
