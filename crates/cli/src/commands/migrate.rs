//! Session store migration.
//!
//! # Usage
//!
//! ```bash
//! gr-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `SQLite` URL for the session store, falling
//!   back to `DATABASE_URL` and then `sqlite://garden_records.db?mode=rwc`

use garden_records_storefront::config::{ConfigError, StorefrontConfig};
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;
use tower_sessions_sqlx_store::SqliteStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or migration error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the tower-sessions table that holds every browser's cart.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the database is
/// unreachable.
pub async fn sessions() -> Result<(), MigrationError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to session database...");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Creating session table...");
    SqliteStore::new(pool).migrate().await?;

    tracing::info!("Session migrations complete!");
    Ok(())
}
