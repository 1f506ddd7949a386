//! Liga MX Fixture Sync
//!
//! One-shot job: fetch the league from FotMob, upsert teams and matches into
//! Postgres, exit. Scheduling is left to whatever invokes the binary; a
//! non-zero exit marks the run as failed.

use anyhow::{Context, Result};
use fixture_sync::{Config, FotmobClient, MemoryStore, PgStore, SyncRun};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Local runs may keep settings in .env; deployed runs use real env vars
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "fixture_sync=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Liga MX Fixture Sync v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Sync failed: {:?}", e);
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let feed = FotmobClient::new(&config).context("Failed to create HTTP client")?;

    if config.dry_run {
        info!("DRY_RUN=true: syncing into memory, database untouched");
        let store = MemoryStore::new();
        SyncRun::new(feed, &store).run().await?;
        for m in store.matches() {
            info!(
                "[dry-run] match {}: {} vs {} {} {}-{} ({})",
                m.id,
                m.home_team_id,
                m.away_team_id,
                m.status,
                m.home_score,
                m.away_score,
                m.start_time.as_deref().unwrap_or("no start time")
            );
        }
        return Ok(());
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required")?;
    let store = PgStore::connect(database_url).await?;
    if config.ensure_schema {
        store.ensure_schema().await.context("Failed to create schema")?;
    }

    SyncRun::new(feed, &store).run().await?;
    Ok(())
}
