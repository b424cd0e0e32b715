//! Migrate command - applies or reverts database schema migrations

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{connect, Migrator, PostgresConfig, PostgresMigrator};

#[derive(Args)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

/// Run migrations against the configured PostgreSQL database
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let url = config
        .storage
        .url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("no database URL configured (set storage.url or DATABASE_URL)")
        })?;

    let pg_config =
        PostgresConfig::new(url).with_max_connections(config.storage.max_connections);
    let pool = connect(&pg_config).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        migrator.revert().await?;
        info!("Reverted last migration");
    } else {
        migrator.run().await?;
        info!("Migrations applied");
    }

    match migrator.version().await? {
        Some(version) => info!("Schema at version {}", version),
        None => info!("Schema is empty"),
    }

    Ok(())
}
