// CLI module for operator tasks run against the store

pub mod bootstrap;
pub mod users;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::coordinators::BootstrapReport;

/// Tabwarden operator CLI
///
/// Every invocation connects, migrates and ensures the bootstrap state
/// before running the subcommand.
#[derive(Parser)]
#[command(name = "tabwarden")]
#[command(about = "Identity and access control for the reporting dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show what the startup bootstrap created, including a generated root password
    Bootstrap,

    /// List accounts waiting for approval
    Pending,
}

/// Route the parsed command to its handler
pub async fn execute_command(
    cli: Cli,
    app_data: Arc<AppData>,
    report: BootstrapReport,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Bootstrap) => bootstrap::print_report(&report, app_data.settings.root_username()),
        Some(Commands::Pending) => users::print_pending(app_data).await?,
        None => {
            if let Some(password) = &report.generated_password {
                // Shown once; the digest is all that is stored
                println!("Generated root password: {}", password);
            }
        }
    }
    Ok(())
}
