//! Schema bootstrap command.

use anyhow::{Context, Result};
use clap::Parser;

use labreg_server::{create_pool, run_migrations};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = super::database_url(args.database_url)?;

    let pool = create_pool(&database_url)
        .await
        .context("failed to create database pool")?;

    run_migrations(&pool)
        .await
        .context("failed to bootstrap schema")?;

    tracing::info!("schema is up to date");
    Ok(())
}
