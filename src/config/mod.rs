//! SQLite-based storage for the student manager
//!
//! This module provides persistent storage for:
//! - Student records (the minimal CRUD contract the CLI needs)
//! - Category options (faculty / status / program)
//! - Configuration key-value pairs that drive the validation rules

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub mod db;
pub mod migrations;
pub mod models;
pub mod repository;

pub use models::*;
pub use repository::catalog::CatalogError;
pub use repository::students::RecordError;

/// Main storage handle. Passed explicitly to every component that needs
/// it; there is no process-global connection.
pub struct Config {
    pool: sqlx::SqlitePool,
    db_path: PathBuf,
}

impl Config {
    /// Path to the SQLite database file.
    pub fn get_db_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("student-cli")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".student-cli")
        };

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            log::info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("students.db"))
    }

    /// Open the database, run migrations and seed defaults.
    ///
    /// Seeding is idempotent: each default key or option value is inserted
    /// only if absent, so customized values survive restarts.
    pub async fn load() -> Result<Self> {
        let db_path = Self::get_db_path()?;
        log::debug!("Loading database from: {:?}", db_path);

        let pool = db::connect(&db_path).await?;
        db::run_migrations(&pool).await?;
        repository::settings::seed_defaults(&pool).await?;
        repository::catalog::seed_defaults(&pool).await?;

        Ok(Self { pool, db_path })
    }

    /// In-memory database for testing, migrated and seeded like a real one.
    pub async fn new_test() -> Result<Self> {
        let pool = db::connect_memory().await?;
        db::run_migrations(&pool).await?;
        repository::settings::seed_defaults(&pool).await?;
        repository::catalog::seed_defaults(&pool).await?;

        Ok(Self {
            pool,
            db_path: PathBuf::from(":memory:"),
        })
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // Configuration methods

    pub async fn get_config(&self, key: &str) -> Result<Option<String>> {
        repository::settings::get(&self.pool, key).await
    }

    pub async fn get_config_or(&self, key: &str, default: &str) -> Result<String> {
        repository::settings::get_or(&self.pool, key, default).await
    }

    pub async fn set_config(&self, key: &str, value: &str) -> Result<()> {
        repository::settings::set(&self.pool, key, value).await
    }

    pub async fn list_config(&self) -> Result<Vec<ConfigEntry>> {
        repository::settings::list(&self.pool).await
    }

    // Category option methods

    pub async fn list_options(&self, category: &str) -> Result<Vec<String>> {
        repository::catalog::list(&self.pool, category).await
    }

    pub async fn add_option(&self, category: &str, value: &str) -> Result<()> {
        repository::catalog::add(&self.pool, category, value).await
    }

    /// Remove an option value, refusing with [`CatalogError::ValueInUse`]
    /// while any student record still references it. This is the
    /// referential guard the catalog itself does not enforce.
    pub async fn remove_option(&self, category: &str, value: &str) -> Result<()> {
        let count = repository::students::count_referencing(&self.pool, category, value).await?;
        if count > 0 {
            return Err(CatalogError::ValueInUse {
                category: category.to_string(),
                value: value.to_string(),
                count,
            }
            .into());
        }
        repository::catalog::remove(&self.pool, category, value).await
    }

    // Student record methods

    pub async fn insert_student(&self, draft: &StudentDraft) -> Result<()> {
        repository::students::insert(&self.pool, draft).await
    }

    pub async fn get_student(&self, mssv: &str) -> Result<Option<StudentRecord>> {
        repository::students::get(&self.pool, mssv).await
    }

    pub async fn set_student_status(&self, mssv: &str, status: &str) -> Result<()> {
        repository::students::set_status(&self.pool, mssv, status).await
    }

    pub async fn delete_student(&self, mssv: &str) -> Result<()> {
        repository::students::delete(&self.pool, mssv).await
    }

    pub async fn search_students(
        &self,
        faculty: Option<&str>,
        name: Option<&str>,
    ) -> Result<Vec<StudentRecord>> {
        repository::students::search(&self.pool, faculty, name).await
    }
}
