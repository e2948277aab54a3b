//! Engine-level tests for the sync orchestrator
//!
//! These drive the whole pipeline against a mock device directory:
//! dispatch, collection, normalization, reconciliation and pool
//! provisioning, with no live devices.

use super::*;
use crate::models::Platform;
use crate::pools::provision_pools;
use crate::source::FsDeviceSource;
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

fn platform(name: &str) -> Platform {
    Platform {
        name: name.to_string(),
        version: "1.0".to_string(),
        model: "test".to_string(),
        serial_number: "SN".to_string(),
    }
}

async fn write_xr_fixtures(root: &std::path::Path, device: &str) {
    let dev = root.join(device);
    fs::create_dir_all(&dev).await.unwrap();
    fs::write(
        dev.join("inventory.json"),
        r#"[{"name": "0/RP0/CPU0", "descr": "RP", "pid": "NCS-55A1", "sn": "FOC1"}]"#,
    )
    .await
    .unwrap();
    fs::write(
        dev.join("controllers_optics.json"),
        r#"[{"id": "Optics0/0/0/0", "instance": {"controller_state": "UP", "transceiver_vendor_details": {"optics_type": "QSFP28", "name": "V", "part_number": "PN", "serial_number": "SN", "pid": "PID"}}}]"#,
    )
    .await
    .unwrap();
    fs::write(dev.join("interfaces_GigabitEthernet.json"), r#"["0/0/0/1"]"#)
        .await
        .unwrap();
}

async fn write_vrp_fixtures(root: &std::path::Path, device: &str) {
    let dev = root.join(device);
    fs::create_dir_all(&dev).await.unwrap();
    fs::write(
        dev.join("elabel_brief.txt"),
        "LPU 1 CR57EMGFB23 210305505310HA000037 LPUI-51-E-48xFE/GE-SFP-A\n  PIC 0 CR57EFGFB2 030PMH10HA000226 24x100/1000Base-X-SFP\n",
    )
    .await
    .unwrap();
    fs::write(
        dev.join("ifm_interfaces.json"),
        r#"[{"name": "GigabitEthernet", "number": "1/0/1", "admin_status": "up", "oper_status": "up"}]"#,
    )
    .await
    .unwrap();
}

async fn write_sros_fixtures(root: &std::path::Path, device: &str) {
    let dev = root.join(device);
    fs::create_dir_all(&dev).await.unwrap();
    fs::write(
        dev.join("state_cards.json"),
        r#"[{"card_id": "1", "equipped_type": "iom4-e", "serial_number": "NS1"}]"#,
    )
    .await
    .unwrap();
    fs::write(
        dev.join("state_slots.json"),
        r#"[{"slot_id": "2", "mdas": [{"mda_id": "0", "equipped_type": "me6", "serial_number": "NS2"}]}]"#,
    )
    .await
    .unwrap();
    fs::write(
        dev.join("state_ports.json"),
        r#"[{"port_id": "1/1/1", "oper_state": "up"}]"#,
    )
    .await
    .unwrap();
    fs::write(dev.join("state_lags.json"), r#"[{"lag_id": "10"}]"#)
        .await
        .unwrap();
}

fn engine(store: InventoryStore, dir: &TempDir) -> SyncEngine {
    SyncEngine::new(
        store,
        Arc::new(FsDeviceSource::new(dir.path())),
        SyncConfig::default(),
    )
}

#[tokio::test]
async fn test_all_mode_reconciles_every_platform() {
    let dir = TempDir::new().unwrap();
    write_xr_fixtures(dir.path(), "xr1").await;
    write_vrp_fixtures(dir.path(), "hw1").await;
    write_sros_fixtures(dir.path(), "sr1").await;

    let store = InventoryStore::new();
    store.register_device("xr1", platform("cisco-iosxr-7.3")).await;
    store.register_device("hw1", platform("huawei-vrp8")).await;
    store.register_device("sr1", platform("nokia-sros-21")).await;

    let engine = engine(store.clone(), &dir);
    let report = engine
        .run(SyncRequest {
            target: TargetMode::All,
            devices: vec![],
        })
        .await
        .unwrap();

    assert_eq!(report.devices_processed, 3);
    assert!(report.failures.is_empty());

    // Each device got its platform copied from the registry.
    for device in ["xr1", "hw1", "sr1"] {
        let inventory = store.inventory(device).await.unwrap();
        assert!(inventory.platform.is_some());
    }

    // Spot-check each adapter's records landed.
    assert!(store
        .inventory("xr1")
        .await
        .unwrap()
        .modules
        .contains_key("0/RP0/CPU0"));
    let hw1 = store.inventory("hw1").await.unwrap();
    assert!(hw1.modules.contains_key("LPU1"));
    assert!(hw1.modules.contains_key("LPU1/0"));
    let sr1 = store.inventory("sr1").await.unwrap();
    assert!(sr1.modules.contains_key("1"));
    assert!(sr1.modules.contains_key("2/0"));

    // Pools cover globals, each device, and each stored interface.
    assert!(store.pool("xr1-port-id").await.is_some());
    assert!(store
        .pool("hw1-GigabitEthernet1/0/1-subinterface-id")
        .await
        .is_some());
    assert!(store.pool("sr1-port1/1/1-subinterface-id").await.is_some());
    assert!(store.pool("sr1-lag10-subinterface-id").await.is_some());
}

#[tokio::test]
async fn test_specify_mode_with_empty_list_does_nothing() {
    let dir = TempDir::new().unwrap();
    let store = InventoryStore::new();
    store.register_device("xr1", platform("cisco-iosxr")).await;

    // Pre-provision the global pools so a no-op run needs no write.
    provision_pools(&store, "admin", &PoolConfig::default(), &[])
        .await
        .unwrap();
    let opened_before = store.transactions_opened();

    let engine = engine(store.clone(), &dir);
    let report = engine
        .run(SyncRequest {
            target: TargetMode::Specify,
            devices: vec![],
        })
        .await
        .unwrap();

    assert_eq!(report.devices_processed, 0);
    assert!(report.failures.is_empty());
    assert_eq!(report.pools_created, 0);
    // No device work, nothing missing: no transaction was opened.
    assert_eq!(store.transactions_opened(), opened_before);
}

#[tokio::test]
async fn test_failing_device_does_not_block_the_rest() {
    let dir = TempDir::new().unwrap();
    // "ghost" has no fixture directory and will fail collection.
    write_sros_fixtures(dir.path(), "sr1").await;

    let store = InventoryStore::new();
    store.register_device("ghost", platform("cisco-iosxr")).await;
    store.register_device("sr1", platform("nokia-sros")).await;

    let engine = engine(store.clone(), &dir);
    let report = engine
        .run(SyncRequest {
            target: TargetMode::All,
            devices: vec![],
        })
        .await
        .unwrap();

    assert_eq!(report.devices_processed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].device, "ghost");
    assert!(store.inventory("sr1").await.unwrap().modules.contains_key("1"));
}

#[tokio::test]
async fn test_unregistered_device_in_specify_list_is_a_failure() {
    let dir = TempDir::new().unwrap();
    let store = InventoryStore::new();

    let engine = engine(store.clone(), &dir);
    let report = engine
        .run(SyncRequest {
            target: TargetMode::Specify,
            devices: vec!["nowhere".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(report.devices_processed, 0);
    assert_eq!(report.failures.len(), 1);
}

#[tokio::test]
async fn test_unknown_platform_falls_through_to_default_adapter() {
    let dir = TempDir::new().unwrap();
    // SR OS shaped fixtures under a platform name nothing classifies.
    write_sros_fixtures(dir.path(), "mys1").await;

    let store = InventoryStore::new();
    store.register_device("mys1", platform("acme-os-1.0")).await;

    let engine = engine(store.clone(), &dir);
    let report = engine
        .run(SyncRequest {
            target: TargetMode::Specify,
            devices: vec!["mys1".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(report.devices_processed, 1);
    assert!(store.inventory("mys1").await.unwrap().modules.contains_key("2/0"));
}

#[tokio::test]
async fn test_exhausted_budget_starts_no_devices() {
    let dir = TempDir::new().unwrap();
    write_sros_fixtures(dir.path(), "sr1").await;

    let store = InventoryStore::new();
    store.register_device("sr1", platform("nokia-sros")).await;

    let engine = SyncEngine::new(
        store.clone(),
        Arc::new(FsDeviceSource::new(dir.path())),
        SyncConfig {
            deadline: Duration::from_secs(0),
            ..Default::default()
        },
    );
    let report = engine
        .run(SyncRequest {
            target: TargetMode::All,
            devices: vec![],
        })
        .await
        .unwrap();

    assert_eq!(report.devices_processed, 0);
    assert!(store.inventory("sr1").await.is_none());
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() {
    let dir = TempDir::new().unwrap();
    write_vrp_fixtures(dir.path(), "hw1").await;

    let store = InventoryStore::new();
    store.register_device("hw1", platform("huawei-vrp8")).await;

    let engine = engine(store.clone(), &dir);
    let request = SyncRequest {
        target: TargetMode::All,
        devices: vec![],
    };

    engine.run(request.clone()).await.unwrap();
    let first = store.inventory("hw1").await.unwrap();
    let pools_first = store.pools().await;

    let report = engine.run(request).await.unwrap();
    let second = store.inventory("hw1").await.unwrap();
    let pools_second = store.pools().await;

    assert_eq!(first.modules, second.modules);
    assert_eq!(first.interfaces, second.interfaces);
    assert_eq!(pools_first, pools_second);
    assert_eq!(report.pools_created, 0);
}
