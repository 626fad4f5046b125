pub mod migrate;
pub mod serve;

use anyhow::{Context, Result};

/// Resolve the database URL: explicit flag first, then the environment
/// (including anything dotenvy loaded from `.env`).
pub fn database_url(flag: Option<String>) -> Result<String> {
    flag.or_else(|| std::env::var("DATABASE_URL").ok())
        .context("DATABASE_URL not set. Set via --database-url, the DATABASE_URL env var, or .env")
}
