//! API client for the inventory sync service

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Request body for the sync action.
#[derive(Debug, Serialize)]
pub struct SyncRequest {
    pub target: String,
    pub devices: Vec<String>,
}

/// Response of the sync action.
#[derive(Debug, Deserialize)]
pub struct SyncResponse {
    pub devices_processed: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Platform {
    pub name: String,
    pub version: String,
    pub model: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Module {
    pub slot_id: String,
    pub description: String,
    pub product_id: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Controller {
    pub id: String,
    pub state: String,
    pub optics_type: String,
    pub name: String,
    pub part_number: String,
    pub serial_number: String,
    pub product_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interface {
    pub size: String,
    pub number: String,
}

/// Full reconciled inventory of one device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInventory {
    pub platform: Option<Platform>,
    pub modules: BTreeMap<String, Module>,
    pub controllers: BTreeMap<String, Controller>,
    pub interfaces: Vec<Interface>,
}

/// One row of the device listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSummary {
    pub device: String,
    pub platform: Option<String>,
    pub modules: usize,
    pub controllers: usize,
    pub interfaces: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pool {
    pub name: String,
    pub range_start: u32,
    pub range_end: u32,
}

/// HTTP client for the service API.
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(1830))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}
