//! Category option repository
//!
//! Maps a category name (faculty, status, program) to the set of values
//! currently selectable for that category. Removal here is unconditional;
//! the referential guard against values still used by student records is
//! enforced one level up, in [`crate::config::Config::remove_option`].

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use thiserror::Error;

/// Named failure conditions for catalog changes, so callers can show a
/// specific message instead of a generic one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("option '{value}' already exists in category '{category}'")]
    DuplicateOption { category: String, value: String },
    #[error("cannot remove '{value}' from '{category}': {count} student record(s) still use it")]
    ValueInUse {
        category: String,
        value: String,
        count: i64,
    },
}

/// Values for a category, in insertion order. An empty result is valid
/// state: a category with no values simply fails every membership check.
pub async fn list(pool: &SqlitePool, category: &str) -> Result<Vec<String>> {
    sqlx::query_scalar("SELECT value FROM settings WHERE category = ? ORDER BY rowid")
        .bind(category)
        .fetch_all(pool)
        .await
        .context("Failed to list category options")
}

/// Exact, case-sensitive membership check.
pub async fn contains(pool: &SqlitePool, category: &str, value: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM settings WHERE category = ? AND value = ?")
            .bind(category)
            .bind(value)
            .fetch_one(pool)
            .await
            .context("Failed to check category membership")?;
    Ok(count > 0)
}

/// Add a value to a category. Fails with [`CatalogError::DuplicateOption`]
/// if the pair already exists.
pub async fn add(pool: &SqlitePool, category: &str, value: &str) -> Result<()> {
    if contains(pool, category, value).await? {
        return Err(CatalogError::DuplicateOption {
            category: category.to_string(),
            value: value.to_string(),
        }
        .into());
    }

    sqlx::query("INSERT INTO settings (category, value) VALUES (?, ?)")
        .bind(category)
        .bind(value)
        .execute(pool)
        .await
        .context("Failed to add category option")?;

    log::info!("Added option '{}' to category '{}'", value, category);
    Ok(())
}

/// Remove a value from a category unconditionally. Removing a category's
/// last value is legal.
pub async fn remove(pool: &SqlitePool, category: &str, value: &str) -> Result<()> {
    sqlx::query("DELETE FROM settings WHERE category = ? AND value = ?")
        .bind(category)
        .bind(value)
        .execute(pool)
        .await
        .context("Failed to remove category option")?;

    log::info!("Removed option '{}' from category '{}'", value, category);
    Ok(())
}

/// Default option values seeded on first run.
const DEFAULTS: &[(&str, &[&str])] = &[
    (
        "faculty",
        &[
            "Khoa Luật",
            "Khoa Tiếng Anh thương mại",
            "Khoa Tiếng Nhật",
            "Khoa Tiếng Pháp",
        ],
    ),
    (
        "status",
        &["Đang học", "Đã tốt nghiệp", "Đã thôi học", "Tạm dừng học"],
    ),
    ("program", &["Cử nhân", "Thạc sĩ", "Tiến sĩ"]),
];

/// Insert the built-in option values for any pair not already present.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    for (category, values) in DEFAULTS {
        for value in *values {
            sqlx::query(
                "INSERT INTO settings (category, value) VALUES (?, ?)
                 ON CONFLICT(category, value) DO NOTHING",
            )
            .bind(category)
            .bind(value)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to seed option '{}' in '{}'", value, category))?;
        }
    }

    log::debug!("Seeded default options for {} categories", DEFAULTS.len());
    Ok(())
}
