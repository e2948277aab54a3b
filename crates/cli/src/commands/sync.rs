//! Sync trigger command

use anyhow::Result;

use crate::client::{ApiClient, SyncRequest, SyncResponse};
use crate::output::{print_success, print_warning};
use crate::TargetArg;

/// Trigger a sync run on the service.
pub async fn run_sync(client: &ApiClient, target: TargetArg, devices: Vec<String>) -> Result<()> {
    let target = match target {
        TargetArg::All => "all",
        TargetArg::Specify => "specify",
    };

    if target == "all" && !devices.is_empty() {
        print_warning("--device is ignored with --target all");
    }

    let request = SyncRequest {
        target: target.to_string(),
        devices,
    };

    let response: SyncResponse = client.post("/sync", &request).await?;
    print_success(&format!("Devices processed: {}", response.devices_processed));

    Ok(())
}
