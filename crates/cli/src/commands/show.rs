//! Inventory inspection commands

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, DeviceInventory, DeviceSummary};
use crate::output::{color_state, print_table, OutputFormat};

/// Row for the module table
#[derive(Tabled, Serialize)]
struct ModuleRow {
    #[tabled(rename = "Slot")]
    slot_id: String,
    #[tabled(rename = "Product ID")]
    product_id: String,
    #[tabled(rename = "Serial")]
    serial_number: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Row for the controller table
#[derive(Tabled, Serialize)]
struct ControllerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Optics")]
    optics_type: String,
    #[tabled(rename = "Part Number")]
    part_number: String,
    #[tabled(rename = "Serial")]
    serial_number: String,
}

/// Row for the interface table
#[derive(Tabled, Serialize)]
struct InterfaceRow {
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Number")]
    number: String,
}

/// Row for the device listing
#[derive(Tabled, Serialize)]
struct DeviceRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Modules")]
    modules: usize,
    #[tabled(rename = "Controllers")]
    controllers: usize,
    #[tabled(rename = "Interfaces")]
    interfaces: usize,
}

async fn fetch_inventory(client: &ApiClient, device: &str) -> Result<DeviceInventory> {
    client.get(&format!("/inventory/{}", device)).await
}

pub async fn show_modules(client: &ApiClient, device: &str, format: OutputFormat) -> Result<()> {
    let inventory = fetch_inventory(client, device).await?;

    let rows: Vec<ModuleRow> = inventory
        .modules
        .into_values()
        .map(|module| ModuleRow {
            slot_id: module.slot_id,
            product_id: module.product_id,
            serial_number: module.serial_number,
            description: module.description,
        })
        .collect();

    print_table(&rows, format);
    Ok(())
}

pub async fn show_controllers(client: &ApiClient, device: &str, format: OutputFormat) -> Result<()> {
    let inventory = fetch_inventory(client, device).await?;

    let rows: Vec<ControllerRow> = inventory
        .controllers
        .into_values()
        .map(|controller| ControllerRow {
            id: controller.id,
            state: color_state(&controller.state),
            optics_type: controller.optics_type,
            part_number: controller.part_number,
            serial_number: controller.serial_number,
        })
        .collect();

    print_table(&rows, format);
    Ok(())
}

pub async fn show_interfaces(client: &ApiClient, device: &str, format: OutputFormat) -> Result<()> {
    let inventory = fetch_inventory(client, device).await?;

    let rows: Vec<InterfaceRow> = inventory
        .interfaces
        .into_iter()
        .map(|interface| InterfaceRow {
            size: interface.size,
            number: interface.number,
        })
        .collect();

    print_table(&rows, format);
    Ok(())
}

pub async fn show_devices(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let summaries: Vec<DeviceSummary> = client.get("/inventory").await?;

    let rows: Vec<DeviceRow> = summaries
        .into_iter()
        .map(|summary| DeviceRow {
            device: summary.device,
            platform: summary.platform.unwrap_or_else(|| "-".to_string()),
            modules: summary.modules,
            controllers: summary.controllers,
            interfaces: summary.interfaces,
        })
        .collect();

    print_table(&rows, format);
    Ok(())
}
