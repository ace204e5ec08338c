//! Data models for the student database

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the config table. Values are opaque strings that consumers
/// parse at the boundary (JSON, regex, boolean, integer).
#[derive(Debug, Clone, FromRow)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// One row of the settings table: a selectable value within a category
/// (faculty, status, program).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OptionEntry {
    pub category: String,
    pub value: String,
}

/// A stored student record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentRecord {
    pub id: i64,
    pub mssv: String,
    pub name: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub faculty: Option<String>,
    pub course: Option<String>,
    pub program: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Incoming student data, before validation and storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentDraft {
    #[serde(default)]
    pub mssv: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: String,
}
