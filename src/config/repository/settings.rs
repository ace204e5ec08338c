//! Configuration key-value repository
//!
//! The config table drives the validation rules: email domains, the phone
//! pattern, the deletion window, the status transition table and the
//! global rule switch all live here as strings.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::models::ConfigEntry;

/// Configuration seeded on first run. Re-seeding is a per-key no-op, so a
/// customized value is never overwritten.
const DEFAULTS: &[(&str, &str, &str)] = &[
    (
        "allowed_email_domains",
        "@student.university.edu.vn",
        "Comma-separated list of acceptable email suffixes",
    ),
    (
        "phone_pattern",
        r"^(\+84|0)[3|5|7|8|9][0-9]{8}$",
        "Regular expression a phone number must fully match",
    ),
    (
        "deletion_window_minutes",
        "30",
        "Minutes after creation during which a record may be deleted",
    ),
    (
        "status_transitions",
        r#"{"Đang học": ["Bảo lưu", "Tốt nghiệp", "Đình chỉ"], "Bảo lưu": ["Đang học", "Đình chỉ"], "Đình chỉ": [], "Tốt nghiệp": []}"#,
        "JSON object mapping each status to the statuses it may change into",
    ),
    (
        "enable_rules",
        "true",
        "Global switch for transition and deletion rule enforcement",
    ),
    (
        "school_name",
        "Trường Đại học ABC",
        "Display name of the school",
    ),
];

/// Get a configuration value, `None` if the key has never been set.
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    sqlx::query_scalar("SELECT value FROM config WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to read config value")
}

/// Get a configuration value, falling back to `default` when the key is
/// absent. An absent key is not an error.
pub async fn get_or(pool: &SqlitePool, key: &str, default: &str) -> Result<String> {
    Ok(get(pool, key).await?.unwrap_or_else(|| default.to_string()))
}

/// Set a configuration value (insert or update).
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO config (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .context("Failed to set config value")?;

    log::debug!("Set config: {} = {}", key, value);
    Ok(())
}

/// All configuration entries, ordered by key.
pub async fn list(pool: &SqlitePool) -> Result<Vec<ConfigEntry>> {
    sqlx::query_as::<_, ConfigEntry>(
        "SELECT key, value, description FROM config ORDER BY key",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list config entries")
}

/// Insert the built-in defaults for any key not already present.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    for (key, value, description) in DEFAULTS {
        sqlx::query(
            "INSERT INTO config (key, value, description) VALUES (?, ?, ?)
             ON CONFLICT(key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed config key '{}'", key))?;
    }

    log::debug!("Seeded {} default config keys", DEFAULTS.len());
    Ok(())
}
