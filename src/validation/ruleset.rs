//! Typed view of the validation configuration
//!
//! The config table stores everything as text: a regex, a JSON object, a
//! boolean and an integer. `Ruleset::load` parses all of it in one place
//! so malformed configuration fails loudly here, as a configuration
//! error, instead of surfacing as a mysterious validation result later.

use anyhow::Result;
use chrono::Duration;
use regex::Regex;
use sqlx::SqlitePool;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::repository::settings;

pub const DEFAULT_EMAIL_DOMAINS: &str = "@student.university.edu.vn";
pub const DEFAULT_PHONE_PATTERN: &str = r"^(\+84|0)[3|5|7|8|9][0-9]{8}$";
pub const DEFAULT_DELETION_WINDOW_MINUTES: i64 = 30;

/// Configuration values that cannot be parsed into their expected type.
/// These are administrator errors, distinct from invalid user input.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config key 'status_transitions' does not hold a valid JSON transition table: {0}")]
    BadTransitionTable(#[source] serde_json::Error),
    #[error("config key 'phone_pattern' does not hold a valid regular expression: {0}")]
    BadPhonePattern(#[source] regex::Error),
    #[error("config key 'deletion_window_minutes' does not hold an integer: '{0}'")]
    BadDeletionWindow(String),
}

/// Validation rules parsed from the config table.
#[derive(Debug, Clone)]
pub struct Ruleset {
    /// Acceptable email suffixes, already split and trimmed.
    pub allowed_email_domains: Vec<String>,
    /// Compiled phone pattern; a phone number must match it in full.
    pub phone_pattern: Regex,
    /// How long after creation a record may still be deleted.
    pub deletion_window: Duration,
    /// Status -> permitted next statuses. A status absent from the map has
    /// no outgoing transitions.
    pub transitions: HashMap<String, Vec<String>>,
    /// Global switch: when false, transition and deletion rules pass
    /// unconditionally.
    pub rules_enabled: bool,
}

impl Ruleset {
    /// Read and parse the current configuration. Call per check; there is
    /// no caching, so edits made through the config commands apply to the
    /// very next validation.
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let domains =
            settings::get_or(pool, "allowed_email_domains", DEFAULT_EMAIL_DOMAINS).await?;
        let allowed_email_domains = domains
            .split(',')
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        let pattern = settings::get_or(pool, "phone_pattern", DEFAULT_PHONE_PATTERN).await?;
        let phone_pattern = Regex::new(&pattern).map_err(ConfigError::BadPhonePattern)?;

        let raw_window = settings::get_or(pool, "deletion_window_minutes", "30").await?;
        let minutes: i64 = raw_window
            .trim()
            .parse()
            .map_err(|_| ConfigError::BadDeletionWindow(raw_window.clone()))?;

        let table = settings::get_or(pool, "status_transitions", "{}").await?;
        let transitions: HashMap<String, Vec<String>> =
            serde_json::from_str(&table).map_err(ConfigError::BadTransitionTable)?;

        let rules_enabled = settings::get_or(pool, "enable_rules", "true")
            .await?
            .trim()
            .eq_ignore_ascii_case("true");

        Ok(Self {
            allowed_email_domains,
            phone_pattern,
            deletion_window: Duration::minutes(minutes),
            transitions,
            rules_enabled,
        })
    }

    /// Pre-flight check for a value about to be written under `key`.
    /// Catches a bad regex, transition table or window before it is
    /// stored, so later `load` calls cannot be poisoned.
    pub fn check_value(key: &str, value: &str) -> Result<()> {
        match key {
            "phone_pattern" => {
                Regex::new(value).map_err(ConfigError::BadPhonePattern)?;
            }
            "status_transitions" => {
                serde_json::from_str::<HashMap<String, Vec<String>>>(value)
                    .map_err(ConfigError::BadTransitionTable)?;
            }
            "deletion_window_minutes" => {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::BadDeletionWindow(value.to_string()))?;
            }
            _ => {}
        }
        Ok(())
    }
}
