//! HTTP server command.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use labreg_server::{create_pool, run_migrations, run_server, PgStore, ServerConfig};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Skip schema bootstrap at startup
    #[arg(long)]
    pub skip_migrations: bool,

    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = super::database_url(args.database_url)?;

    let pool = create_pool(&database_url)
        .await
        .context("failed to create database pool")?;

    if !args.skip_migrations {
        run_migrations(&pool)
            .await
            .context("failed to bootstrap schema")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("starting labreg server on {}", args.bind);

    run_server(Arc::new(PgStore::new(pool)), config)
        .await
        .context("server error")?;

    Ok(())
}
