//! Recetario maintenance binary.
//!
//! One-shot administrative job: re-normalizes every recipe's ingredient
//! list (accepting the relaxed newline/semicolon separators) and rebuilds
//! the entire similarity store from scratch. Run it out of band — cron or
//! by hand — never while writers are active, since it replaces the whole
//! edge table.

use std::env;

use recipe_store::SqliteRecipeStore;
use similarity::rebuild_all;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let log_level = env::var("RECETARIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:recetario.db?mode=rwc".to_string());

    tracing::info!("Starting similarity maintenance run");

    let store = SqliteRecipeStore::connect(&database_url).await?;
    let summary = rebuild_all(&store).await?;

    tracing::info!(
        recipes = summary.recipes,
        normalized = summary.normalized,
        pairs = summary.pairs,
        "Maintenance run complete"
    );

    Ok(())
}
