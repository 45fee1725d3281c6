//! Copies contacts that landed in the local fallback file into the database.
//!
//! Rows whose e-mail address already exists in the `contacts` table are
//! skipped, so the tool can be re-run safely.

use std::sync::Arc;

use anyhow::{bail, Context};
use portfolio_api::{
    db::postgres::create_pool,
    repositories::{
        contact::ContactRepository, local_file::LocalContactStore, sqlx_repo::SqlxContactRepo,
    },
    settings::AppConfig,
    telemetry::init_tracing,
    use_cases::contact::ContactHandler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::new().context("loading configuration")?;

    let Some(database_url) = config.database_url() else {
        bail!("DATABASE_URL (or APP_DATABASE_URL) must be set to migrate contacts");
    };

    if !config.contacts_file.exists() {
        tracing::info!("No {} file found. Nothing to migrate.", config.contacts_file.display());
        return Ok(());
    }

    let pool = create_pool(database_url, config.db_connect_retries)
        .await
        .context("connecting to the database")?;
    let repo: Arc<dyn ContactRepository> = Arc::new(SqlxContactRepo::new(pool));

    let handler = ContactHandler::new(
        Some(repo),
        LocalContactStore::new(config.contacts_file.clone()),
        None,
    );

    let report = handler
        .migrate_local_to_remote()
        .await
        .map_err(|e| anyhow::anyhow!("migration failed: {}", e))?;

    tracing::info!(
        found = report.found,
        skipped = report.skipped,
        migrated = report.migrated,
        failed = report.failed,
        "Contacts migration finished"
    );

    if report.failed > 0 {
        bail!("{} contact(s) could not be migrated", report.failed);
    }
    Ok(())
}
