//! Adapter integration tests
//!
//! These run each adapter's collect + normalize pair against a mock
//! device directory, without any live device access.

use super::*;
use crate::source::FsDeviceSource;
use tempfile::TempDir;
use tokio::fs;

async fn device_dir(dir: &TempDir, device: &str) -> std::path::PathBuf {
    let path = dir.path().join(device);
    fs::create_dir_all(&path).await.unwrap();
    path
}

mod ios_xr_tests {
    use super::*;

    async fn write_fixtures(dir: &TempDir) {
        let dev = device_dir(dir, "xr1").await;

        fs::write(
            dev.join("inventory.json"),
            r#"[
                {"name": "0/RP0/CPU0", "descr": "Route Processor", "pid": "NCS-55A1", "sn": "FOC2233AAAA"},
                {"name": "0/0/CPU0", "descr": "Line Card", "pid": "NC55-36X100G", "sn": "FOC2233BBBB"},
                {"descr": "row without a name"},
                {"name": 42}
            ]"#,
        )
        .await
        .unwrap();

        fs::write(
            dev.join("controllers_optics.json"),
            r#"[
                {
                    "id": "Optics0/0/0/0",
                    "instance": {
                        "controller_state": "UP",
                        "transceiver_vendor_details": {
                            "optics_type": "QSFP28",
                            "name": "CISCO-FINISAR",
                            "part_number": "FTLC1151RDPL",
                            "serial_number": "FNS22090AAA",
                            "pid": "QSFP-100G-LR4-S"
                        }
                    }
                }
            ]"#,
        )
        .await
        .unwrap();

        fs::write(
            dev.join("interfaces_GigabitEthernet.json"),
            r#"["0/0/0/10", "0/0/0/11"]"#,
        )
        .await
        .unwrap();
        fs::write(dev.join("interfaces_HundredGigE.json"), r#"["0/0/0/0"]"#)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_collect_and_normalize() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::IosXr);

        let raw = adapter.collect(&source, "xr1").await.unwrap();
        let inventory = adapter.normalize("xr1", &raw);

        // Two well-formed rows survive; the nameless and malformed
        // rows are skipped.
        assert_eq!(inventory.modules.len(), 2);
        assert_eq!(inventory.modules[0].slot_id, "0/RP0/CPU0");
        assert_eq!(inventory.modules[1].product_id, "NC55-36X100G");

        // Vendor details are flattened out of the nested instance.
        assert_eq!(inventory.controllers.len(), 1);
        let controller = &inventory.controllers[0];
        assert_eq!(controller.id, "Optics0/0/0/0");
        assert_eq!(controller.state, "UP");
        assert_eq!(controller.optics_type, "QSFP28");
        assert_eq!(controller.name, "CISCO-FINISAR");
        assert_eq!(controller.part_number, "FTLC1151RDPL");
        assert_eq!(controller.product_id, "QSFP-100G-LR4-S");

        // Interfaces are flattened into one list tagged by category.
        assert_eq!(inventory.interfaces.len(), 3);
        assert!(inventory
            .interfaces
            .iter()
            .any(|i| i.size == "GigabitEthernet" && i.number == "0/0/0/10"));
        assert!(inventory
            .interfaces
            .iter()
            .any(|i| i.size == "HundredGigE" && i.number == "0/0/0/0"));
    }

    #[tokio::test]
    async fn test_unreachable_device_is_a_collection_error() {
        let dir = TempDir::new().unwrap();
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::IosXr);

        let err = adapter.collect(&source, "ghost").await.unwrap_err();
        assert!(matches!(err, crate::error::SyncError::Collection { .. }));
    }
}

mod vrp_tests {
    use super::*;

    const ELABEL: &str = "\
LPU 1 CR57EMGFB23 210305505310HA000037 LPUI-51-E-48xFE/GE-SFP-A
  PIC 0 CR57EFGFB2 030PMH10HA000226 24x100/1000Base-X-SFP
PWR 2
";

    const OPTICS: &str = "\
Transceiver information:
-------------------------------------------------------------
Port                Status  Wave(nm)  Type        Vendor-PN
-------------------------------------------------------------
GigabitEthernet1/0/1  Up    1310      1000BASE-LX SFP-GE-LX-SM1310
GigabitEthernet9/0/9  Up    850       1000BASE-SX SFP-GE-SX-MM850
-------------------------------------------------------------
Total: 2
";

    async fn write_fixtures(dir: &TempDir) {
        let dev = device_dir(dir, "hw1").await;
        fs::write(dev.join("elabel_brief.txt"), ELABEL).await.unwrap();
        fs::write(dev.join("optical-module_brief.txt"), OPTICS)
            .await
            .unwrap();
        fs::write(
            dev.join("ifm_interfaces.json"),
            r#"[
                {"name": "GigabitEthernet", "number": "1/0/1", "admin_status": "up", "oper_status": "up"},
                {"name": "Eth_Trunk", "number": "1", "admin_status": "up", "oper_status": "down"}
            ]"#,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_modules_follow_elabel_hierarchy() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Vrp);

        let raw = adapter.collect(&source, "hw1").await.unwrap();
        let inventory = adapter.normalize("hw1", &raw);

        let keys: Vec<_> = inventory.modules.iter().map(|m| m.slot_id.as_str()).collect();
        assert_eq!(keys, vec!["LPU1", "LPU1/0", "PWR2"]);
        assert_eq!(inventory.modules[0].product_id, "CR57EMGFB23");
        assert_eq!(inventory.modules[0].serial_number, "210305505310HA000037");
        assert_eq!(inventory.modules[1].product_id, "CR57EFGFB2");
        assert_eq!(inventory.modules[1].serial_number, "030PMH10HA000226");
        assert_eq!(inventory.modules[2].product_id, "");
    }

    #[tokio::test]
    async fn test_controllers_merge_by_port_key() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Vrp);

        let raw = adapter.collect(&source, "hw1").await.unwrap();
        let inventory = adapter.normalize("hw1", &raw);

        // Interface pass created the skeleton, transceiver pass
        // enriched the same record rather than forking a duplicate.
        let enriched = inventory
            .controllers
            .iter()
            .find(|c| c.id == "GigabitEthernet1/0/1")
            .unwrap();
        assert_eq!(enriched.state, "up/up");
        assert_eq!(enriched.optics_type, "1000BASE-LX");
        assert_eq!(enriched.part_number, "SFP-GE-LX-SM1310");
        // Sparse by platform: the text platform never fills these.
        assert_eq!(enriched.name, "");
        assert_eq!(enriched.serial_number, "");

        // A transceiver on a port missing from the interface table
        // still materializes through create-or-get.
        let orphan = inventory
            .controllers
            .iter()
            .find(|c| c.id == "GigabitEthernet9/0/9")
            .unwrap();
        assert_eq!(orphan.optics_type, "1000BASE-SX");
        assert_eq!(orphan.state, "");

        // The trunk has no optics but keeps its state skeleton.
        let trunk = inventory
            .controllers
            .iter()
            .find(|c| c.id == "Eth_Trunk1")
            .unwrap();
        assert_eq!(trunk.state, "up/down");
        assert_eq!(trunk.optics_type, "");
    }

    #[tokio::test]
    async fn test_interfaces_carry_vendor_size_names() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Vrp);

        let raw = adapter.collect(&source, "hw1").await.unwrap();
        let inventory = adapter.normalize("hw1", &raw);

        assert!(inventory
            .interfaces
            .iter()
            .any(|i| i.size == "Eth_Trunk" && i.number == "1"));
        assert!(inventory
            .interfaces
            .iter()
            .any(|i| i.size == "GigabitEthernet" && i.number == "1/0/1"));
    }

    #[tokio::test]
    async fn test_missing_secondary_captures_degrade_to_empty() {
        let dir = TempDir::new().unwrap();
        let dev = device_dir(&dir, "hw2").await;
        fs::write(dev.join("elabel_brief.txt"), ELABEL).await.unwrap();

        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Vrp);

        let raw = adapter.collect(&source, "hw2").await.unwrap();
        let inventory = adapter.normalize("hw2", &raw);
        assert_eq!(inventory.modules.len(), 3);
        assert!(inventory.controllers.is_empty());
        assert!(inventory.interfaces.is_empty());
    }
}

mod sros_tests {
    use super::*;

    async fn write_fixtures(dir: &TempDir) {
        let dev = device_dir(dir, "sr1").await;

        fs::write(
            dev.join("state_cards.json"),
            r#"[{"card_id": "1", "equipped_type": "iom4-e", "serial_number": "NS1924F0001"}]"#,
        )
        .await
        .unwrap();
        fs::write(
            dev.join("state_slots.json"),
            r#"[{"slot_id": "2", "mdas": [{"mda_id": "0", "equipped_type": "me6-100gb-qsfp28", "serial_number": "NS1924F0002"}]}]"#,
        )
        .await
        .unwrap();
        fs::write(
            dev.join("state_ports.json"),
            r#"[
                {"port_id": "1/1/1", "oper_state": "up", "transceiver": {"optics_type": "QSFP28", "part_number": "3HE12345AA", "serial_number": "OPT0001", "model_number": "100G-LR4"}},
                {"port_id": "1/1/2", "oper_state": "down"}
            ]"#,
        )
        .await
        .unwrap();
        fs::write(dev.join("state_lags.json"), r#"[{"lag_id": "10"}]"#)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_modules_merge_cards_and_mdas() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Sros);

        let raw = adapter.collect(&source, "sr1").await.unwrap();
        let inventory = adapter.normalize("sr1", &raw);

        // One card and one slot with one MDA: keys "1" and "2/0".
        let keys: Vec<_> = inventory.modules.iter().map(|m| m.slot_id.as_str()).collect();
        assert_eq!(keys, vec!["1", "2/0"]);
    }

    #[tokio::test]
    async fn test_controllers_take_inline_transceiver() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Sros);

        let raw = adapter.collect(&source, "sr1").await.unwrap();
        let inventory = adapter.normalize("sr1", &raw);

        assert_eq!(inventory.controllers.len(), 2);
        let optical = &inventory.controllers[0];
        assert_eq!(optical.id, "1/1/1");
        assert_eq!(optical.optics_type, "QSFP28");
        assert_eq!(optical.product_id, "100G-LR4");

        let empty_cage = &inventory.controllers[1];
        assert_eq!(empty_cage.id, "1/1/2");
        assert_eq!(empty_cage.state, "down");
        assert_eq!(empty_cage.optics_type, "");
    }

    #[tokio::test]
    async fn test_interfaces_combine_ports_and_lags() {
        let dir = TempDir::new().unwrap();
        write_fixtures(&dir).await;
        let source = FsDeviceSource::new(dir.path());
        let adapter = adapter_for(PlatformKind::Sros);

        let raw = adapter.collect(&source, "sr1").await.unwrap();
        let inventory = adapter.normalize("sr1", &raw);

        let tagged: Vec<_> = inventory
            .interfaces
            .iter()
            .map(|i| (i.size.as_str(), i.number.as_str()))
            .collect();
        assert_eq!(
            tagged,
            vec![("port", "1/1/1"), ("port", "1/1/2"), ("lag", "10")]
        );
    }
}
