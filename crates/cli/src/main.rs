//! Inventory sync CLI
//!
//! A command-line tool for triggering sync runs and inspecting the
//! reconciled inventory of the fleet.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{pools, show, sync};

/// Inventory sync CLI
#[derive(Parser)]
#[command(name = "inv")]
#[command(author, version, about = "CLI for the network inventory sync service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via INVSYNC_API_URL env var)
    #[arg(long, env = "INVSYNC_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target selection for a sync run.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TargetArg {
    /// Every registered device
    All,
    /// Only the devices passed with --device
    Specify,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trigger a sync run
    Sync {
        /// Target mode
        #[arg(long, value_enum, default_value = "all")]
        target: TargetArg,

        /// Device to sync (repeatable, only with --target specify)
        #[arg(long = "device")]
        devices: Vec<String>,
    },

    /// Show reconciled inventory of one device
    #[command(subcommand)]
    Show(ShowCommands),

    /// List registered devices and their record counts
    Devices,

    /// List provisioned resource pools
    Pools,
}

#[derive(Subcommand)]
pub enum ShowCommands {
    /// Physical and logical modules
    Modules { device: String },
    /// Optical/port controllers
    Controllers { device: String },
    /// Logical interfaces
    Interfaces { device: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Sync { target, devices } => {
            sync::run_sync(&client, target, devices).await?;
        }
        Commands::Show(show_command) => match show_command {
            ShowCommands::Modules { device } => {
                show::show_modules(&client, &device, cli.format).await?;
            }
            ShowCommands::Controllers { device } => {
                show::show_controllers(&client, &device, cli.format).await?;
            }
            ShowCommands::Interfaces { device } => {
                show::show_interfaces(&client, &device, cli.format).await?;
            }
        },
        Commands::Devices => {
            show::show_devices(&client, cli.format).await?;
        }
        Commands::Pools => {
            pools::list_pools(&client, cli.format).await?;
        }
    }

    Ok(())
}
