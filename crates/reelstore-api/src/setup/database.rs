//! Record store selection

use anyhow::{Context, Result};
use reelstore_core::Config;
use reelstore_db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Connect to Postgres when `DATABASE_URL` is set, otherwise fall back to a
/// process-local store.
pub async fn setup_repository(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; video records are kept in memory");
        return Ok(Arc::new(InMemoryVideoRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    let repository = PgVideoRepository::new(pool);
    repository
        .migrate()
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database connected and migrations applied");

    Ok(Arc::new(repository))
}
