//! Deletion time-window policy
//!
//! A record may only be deleted within a configurable interval after its
//! creation. The boundary is inclusive: a record exactly
//! `deletion_window_minutes` old may still be deleted.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::ruleset::Ruleset;
use crate::config::repository::students::{self, RecordError};

pub struct DeletionWindowPolicy<'a> {
    rules: &'a Ruleset,
}

impl<'a> DeletionWindowPolicy<'a> {
    pub fn new(rules: &'a Ruleset) -> Self {
        Self { rules }
    }

    /// Window check against an explicit clock, so callers (and tests) can
    /// pin the boundary exactly. With `enable_rules` off this always
    /// passes.
    pub fn within_window(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if !self.rules.rules_enabled {
            return true;
        }
        now.signed_duration_since(created_at) <= self.rules.deletion_window
    }
}

/// Whether the student identified by `mssv` may still be deleted,
/// evaluated against the wall clock at call time.
///
/// An unknown MSSV is reported as [`RecordError::StudentNotFound`], never
/// as `false`: callers must be able to tell "no such student" apart from
/// "too old to delete".
pub async fn can_delete(pool: &SqlitePool, mssv: &str) -> Result<bool> {
    let rules = Ruleset::load(pool).await?;
    let created_at = students::created_at(pool, mssv)
        .await?
        .ok_or_else(|| RecordError::StudentNotFound(mssv.to_string()))?;

    Ok(DeletionWindowPolicy::new(&rules).within_window(created_at, Utc::now()))
}
