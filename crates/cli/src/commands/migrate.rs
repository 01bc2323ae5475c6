//! Session table migrations.
//!
//! # Usage
//!
//! ```bash
//! bz-cli migrate storefront
//! bz-cli migrate admin
//! bz-cli migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - storefront session database
//! - `ADMIN_DATABASE_URL` - admin session database
//!
//! The tables are the ones `tower-sessions-sqlx-store` reads: storefront
//! sessions in `tower_sessions.session`, admin sessions in `admin.session`.

use bazaar_admin::middleware::session::{SESSION_SCHEMA, SESSION_TABLE};
use bazaar_core::env::{self, ConfigError};
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the storefront session table.
///
/// # Errors
///
/// Returns an error if the URL is missing or the database rejects the DDL.
pub async fn storefront() -> Result<(), MigrationError> {
    let url = env::first_of(&["STOREFRONT_DATABASE_URL", "DATABASE_URL"])?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&url).await?;

    tracing::info!("Creating storefront session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}

/// Create the admin session table.
///
/// # Errors
///
/// Returns an error if the URL is missing or the database rejects the DDL.
pub async fn admin() -> Result<(), MigrationError> {
    let url = env::required("ADMIN_DATABASE_URL")?;

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&url).await?;

    tracing::info!(schema = SESSION_SCHEMA, table = SESSION_TABLE, "Creating admin session table...");
    PostgresStore::new(pool)
        .with_schema_name(SESSION_SCHEMA)
        .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?
        .with_table_name(SESSION_TABLE)
        .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?
        .migrate()
        .await?;

    tracing::info!("Admin migrations complete!");
    Ok(())
}
