//! Core library for the network inventory sync service
//!
//! This crate provides the full reconciliation pipeline:
//! - Vendor text parsers for CLI output
//! - Platform classification and per-vendor adapters
//! - Inventory store with transactional reconciliation
//! - Resource pool provisioning
//! - The sync orchestrator
//! - Health checks and observability

pub mod adapter;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod parser;
pub mod pools;
pub mod reconcile;
pub mod source;
pub mod store;
pub mod sync;

pub use error::{StoreError, SyncError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::SyncMetrics;
pub use store::{DeviceInventory, InventoryStore, WriteTransaction};
