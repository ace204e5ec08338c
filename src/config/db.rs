//! Database connection helpers

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

use super::migrations;

/// Open (or create) the database file at `path`.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    // Single connection: this is a single-user interactive tool, and it
    // keeps per-statement writes trivially atomic.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database at {:?}", path))
}

/// In-memory database for tests.
pub async fn connect_memory() -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")
}

/// Bring the schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    migrations::migrate_up(pool).await
}
