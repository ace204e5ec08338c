//! Student record repository
//!
//! The minimal read/write contract the validation core and the CLI need.
//! Validation itself lives in [`crate::validation`]; nothing here checks
//! field contents.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::models::{StudentDraft, StudentRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("no student with MSSV '{0}'")]
    StudentNotFound(String),
    #[error("a student with MSSV '{0}' already exists")]
    DuplicateMssv(String),
}

/// Insert a new record. The creation timestamp is assigned by the
/// database and anchors the deletion window.
pub async fn insert(pool: &SqlitePool, draft: &StudentDraft) -> Result<()> {
    if get(pool, &draft.mssv).await?.is_some() {
        return Err(RecordError::DuplicateMssv(draft.mssv.clone()).into());
    }

    sqlx::query(
        "INSERT INTO students (mssv, name, dob, gender, faculty, course, program,
                               address, email, phone, status)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&draft.mssv)
    .bind(&draft.name)
    .bind(&draft.dob)
    .bind(&draft.gender)
    .bind(&draft.faculty)
    .bind(&draft.course)
    .bind(&draft.program)
    .bind(&draft.address)
    .bind(&draft.email)
    .bind(&draft.phone)
    .bind(&draft.status)
    .execute(pool)
    .await
    .context("Failed to insert student")?;

    log::info!("Inserted student {}", draft.mssv);
    Ok(())
}

/// Fetch a record by MSSV.
pub async fn get(pool: &SqlitePool, mssv: &str) -> Result<Option<StudentRecord>> {
    sqlx::query_as::<_, StudentRecord>("SELECT * FROM students WHERE mssv = ?")
        .bind(mssv)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch student")
}

/// Creation timestamp for a record, `None` if the MSSV is unknown.
pub async fn created_at(pool: &SqlitePool, mssv: &str) -> Result<Option<DateTime<Utc>>> {
    sqlx::query_scalar("SELECT created_at FROM students WHERE mssv = ?")
        .bind(mssv)
        .fetch_optional(pool)
        .await
        .context("Failed to read student creation timestamp")
}

/// Overwrite a record's status. The transition check happens before this
/// is called.
pub async fn set_status(pool: &SqlitePool, mssv: &str, status: &str) -> Result<()> {
    let result = sqlx::query("UPDATE students SET status = ? WHERE mssv = ?")
        .bind(status)
        .bind(mssv)
        .execute(pool)
        .await
        .context("Failed to update student status")?;

    if result.rows_affected() == 0 {
        return Err(RecordError::StudentNotFound(mssv.to_string()).into());
    }

    log::info!("Updated status of {} to '{}'", mssv, status);
    Ok(())
}

/// Delete a record. The deletion-window check happens before this is
/// called.
pub async fn delete(pool: &SqlitePool, mssv: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM students WHERE mssv = ?")
        .bind(mssv)
        .execute(pool)
        .await
        .context("Failed to delete student")?;

    if result.rows_affected() == 0 {
        return Err(RecordError::StudentNotFound(mssv.to_string()).into());
    }

    log::info!("Deleted student {}", mssv);
    Ok(())
}

/// How many records reference `value` in the column matching `category`.
/// The category is mapped through a whitelist; it is never interpolated
/// into the query text.
pub async fn count_referencing(pool: &SqlitePool, category: &str, value: &str) -> Result<i64> {
    let query = match category {
        "faculty" => "SELECT COUNT(*) FROM students WHERE faculty = ?",
        "status" => "SELECT COUNT(*) FROM students WHERE status = ?",
        "program" => "SELECT COUNT(*) FROM students WHERE program = ?",
        other => anyhow::bail!("category '{}' has no corresponding student column", other),
    };

    sqlx::query_scalar(query)
        .bind(value)
        .fetch_one(pool)
        .await
        .context("Failed to count referencing students")
}

/// Search by faculty and/or partial name. At least one condition is
/// required.
pub async fn search(
    pool: &SqlitePool,
    faculty: Option<&str>,
    name: Option<&str>,
) -> Result<Vec<StudentRecord>> {
    let name_pattern = name.map(|n| format!("%{}%", n));

    let rows = match (faculty, name_pattern) {
        (Some(f), Some(n)) => {
            sqlx::query_as::<_, StudentRecord>(
                "SELECT * FROM students WHERE faculty = ? AND name LIKE ? ORDER BY mssv",
            )
            .bind(f)
            .bind(n)
            .fetch_all(pool)
            .await
        }
        (Some(f), None) => {
            sqlx::query_as::<_, StudentRecord>(
                "SELECT * FROM students WHERE faculty = ? ORDER BY mssv",
            )
            .bind(f)
            .fetch_all(pool)
            .await
        }
        (None, Some(n)) => {
            sqlx::query_as::<_, StudentRecord>(
                "SELECT * FROM students WHERE name LIKE ? ORDER BY mssv",
            )
            .bind(n)
            .fetch_all(pool)
            .await
        }
        (None, None) => anyhow::bail!("at least one search condition is required"),
    };

    rows.context("Failed to search students")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn draft(mssv: &str, name: &str) -> StudentDraft {
        StudentDraft {
            mssv: mssv.to_string(),
            name: name.to_string(),
            faculty: "Khoa Luật".to_string(),
            status: "Đang học".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_roundtrip() {
        let config = Config::new_test().await.unwrap();
        insert(config.pool(), &draft("SV001", "Nguyễn Văn A")).await.unwrap();

        let stored = get(config.pool(), "SV001").await.unwrap().unwrap();
        assert_eq!(stored.mssv, "SV001");
        assert_eq!(stored.name, "Nguyễn Văn A");
        assert!(created_at(config.pool(), "SV001").await.unwrap().is_some());

        assert!(get(config.pool(), "SV999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_mssv_is_a_named_error() {
        let config = Config::new_test().await.unwrap();
        insert(config.pool(), &draft("SV001", "A")).await.unwrap();

        let err = insert(config.pool(), &draft("SV001", "B")).await.unwrap_err();
        assert_eq!(
            *err.downcast_ref::<RecordError>().unwrap(),
            RecordError::DuplicateMssv("SV001".to_string())
        );
    }

    #[tokio::test]
    async fn status_update_and_delete_report_missing_records() {
        let config = Config::new_test().await.unwrap();

        let err = set_status(config.pool(), "SV404", "Bảo lưu").await.unwrap_err();
        assert_eq!(
            *err.downcast_ref::<RecordError>().unwrap(),
            RecordError::StudentNotFound("SV404".to_string())
        );

        let err = delete(config.pool(), "SV404").await.unwrap_err();
        assert!(err.downcast_ref::<RecordError>().is_some());
    }

    #[tokio::test]
    async fn count_referencing_uses_the_column_whitelist() {
        let config = Config::new_test().await.unwrap();
        insert(config.pool(), &draft("SV001", "A")).await.unwrap();
        insert(config.pool(), &draft("SV002", "B")).await.unwrap();

        let count = count_referencing(config.pool(), "faculty", "Khoa Luật").await.unwrap();
        assert_eq!(count, 2);

        let count = count_referencing(config.pool(), "faculty", "Khoa Tiếng Nhật").await.unwrap();
        assert_eq!(count, 0);

        // A category outside the whitelist is a programming error, not a query
        assert!(count_referencing(config.pool(), "mssv", "SV001").await.is_err());
    }

    #[tokio::test]
    async fn search_matches_faculty_and_partial_name() {
        let config = Config::new_test().await.unwrap();
        insert(config.pool(), &draft("SV001", "Nguyễn Văn A")).await.unwrap();
        insert(config.pool(), &draft("SV002", "Trần Thị B")).await.unwrap();

        let hits = search(config.pool(), Some("Khoa Luật"), None).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = search(config.pool(), None, Some("Văn")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].mssv, "SV001");

        assert!(search(config.pool(), None, None).await.is_err());
    }
}
