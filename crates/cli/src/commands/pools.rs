//! Resource pool listing command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, Pool};
use crate::output::{print_table, OutputFormat};

/// Row for the pool table
#[derive(Tabled, Serialize)]
struct PoolRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Range Start")]
    range_start: u32,
    #[tabled(rename = "Range End")]
    range_end: u32,
}

pub async fn list_pools(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let pools: Vec<Pool> = client.get("/pools").await?;

    let rows: Vec<PoolRow> = pools
        .into_iter()
        .map(|pool| PoolRow {
            name: pool.name,
            range_start: pool.range_start,
            range_end: pool.range_end,
        })
        .collect();

    print_table(&rows, format);
    Ok(())
}
