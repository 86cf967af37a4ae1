use std::sync::Arc;

use clap::Parser;
use tabwarden::AppData;
use tabwarden::cli::{Cli, execute_command};
use tabwarden::config::database::{connect_database, migrate_database};
use tabwarden::config::{AccessSettings, SystemEnvironment, init_logging};
use tabwarden::coordinators::ensure_bootstrapped;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging(&SystemEnvironment)?;

    let settings = AccessSettings::from_env()?;
    tracing::debug!(?settings, "Settings loaded");

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, settings));

    let report = ensure_bootstrapped(&app_data).await?;
    tracing::info!(
        roles = report.roles_created,
        tabs = report.tabs_created,
        permissions = report.permissions_granted,
        root_created = report.root_created,
        "Bootstrap check complete"
    );

    execute_command(cli, app_data, report).await
}
