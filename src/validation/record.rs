//! Record-level validation
//!
//! Composes the field checks, the option catalog and the configured
//! rules into one "validate this record before write" contract for the
//! CRUD layer.

use anyhow::Result;
use sqlx::SqlitePool;

use super::fields;
use super::ruleset::Ruleset;
use crate::config::models::StudentDraft;
use crate::config::repository::catalog;

/// Validate a draft before it is written.
///
/// Returns `None` when every rule passes, or the message for the first
/// failing rule. Checks run in a fixed order: required fields, date of
/// birth, faculty, status, program (only when given), email, phone.
/// Database and configuration failures propagate as errors, never as
/// reasons.
pub async fn validate_student(pool: &SqlitePool, draft: &StudentDraft) -> Result<Option<String>> {
    let rules = Ruleset::load(pool).await?;

    if draft.mssv.trim().is_empty() || draft.name.trim().is_empty() {
        return Ok(Some("MSSV và Họ Tên không được để trống!".to_string()));
    }
    if !fields::is_valid_date(&draft.dob) {
        return Ok(Some("Ngày sinh không hợp lệ! Định dạng: dd/mm/yyyy".to_string()));
    }
    if !catalog::contains(pool, "faculty", &draft.faculty).await? {
        return Ok(Some("Khoa không hợp lệ!".to_string()));
    }
    if !catalog::contains(pool, "status", &draft.status).await? {
        return Ok(Some("Tình trạng không hợp lệ!".to_string()));
    }
    if !draft.program.is_empty() && !catalog::contains(pool, "program", &draft.program).await? {
        return Ok(Some("Chương trình không hợp lệ!".to_string()));
    }
    if !rules.is_valid_email(&draft.email) {
        return Ok(Some("Email không hợp lệ!".to_string()));
    }
    if !rules.is_valid_phone(&draft.phone) {
        return Ok(Some("Số điện thoại không hợp lệ!".to_string()));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config::repository::settings;

    fn valid_draft() -> StudentDraft {
        StudentDraft {
            mssv: "SV001".to_string(),
            name: "Nguyễn Văn A".to_string(),
            dob: "15/03/2002".to_string(),
            gender: "Nam".to_string(),
            faculty: "Khoa Luật".to_string(),
            course: "K46".to_string(),
            program: "Cử nhân".to_string(),
            address: "Hà Nội".to_string(),
            email: "a.nv@student.university.edu.vn".to_string(),
            phone: "0912345678".to_string(),
            status: "Đang học".to_string(),
        }
    }

    #[tokio::test]
    async fn fully_valid_record_passes() {
        let config = Config::new_test().await.unwrap();
        let verdict = validate_student(config.pool(), &valid_draft()).await.unwrap();
        assert_eq!(verdict, None);
    }

    #[tokio::test]
    async fn required_fields_are_checked_first() {
        let config = Config::new_test().await.unwrap();

        let mut draft = valid_draft();
        draft.mssv = String::new();
        draft.dob = "garbage".to_string(); // later rule would also fail
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "MSSV và Họ Tên không được để trống!");

        let mut draft = valid_draft();
        draft.name = "   ".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "MSSV và Họ Tên không được để trống!");
    }

    #[tokio::test]
    async fn each_rule_reports_its_own_reason() {
        let config = Config::new_test().await.unwrap();

        let mut draft = valid_draft();
        draft.dob = "30/02/2024".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Ngày sinh không hợp lệ! Định dạng: dd/mm/yyyy");

        let mut draft = valid_draft();
        draft.faculty = "Khoa Vũ trụ".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Khoa không hợp lệ!");

        let mut draft = valid_draft();
        draft.status = "Ngủ đông".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Tình trạng không hợp lệ!");

        let mut draft = valid_draft();
        draft.program = "Tiến sĩ giấy".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Chương trình không hợp lệ!");

        let mut draft = valid_draft();
        draft.email = "a@gmail.com".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Email không hợp lệ!");

        let mut draft = valid_draft();
        draft.phone = "012345678".to_string();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Số điện thoại không hợp lệ!");
    }

    #[tokio::test]
    async fn empty_program_is_skipped() {
        let config = Config::new_test().await.unwrap();
        let mut draft = valid_draft();
        draft.program = String::new();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict, None);
    }

    #[tokio::test]
    async fn catalog_changes_apply_immediately() {
        let config = Config::new_test().await.unwrap();
        let mut draft = valid_draft();
        draft.faculty = "Khoa CNTT".to_string();

        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Khoa không hợp lệ!");

        config.add_option("faculty", "Khoa CNTT").await.unwrap();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict, None);

        config.remove_option("faculty", "Khoa CNTT").await.unwrap();
        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Khoa không hợp lệ!");
    }

    #[tokio::test]
    async fn config_changes_apply_immediately() {
        let config = Config::new_test().await.unwrap();
        let mut draft = valid_draft();
        draft.email = "a@example.com".to_string();

        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict.unwrap(), "Email không hợp lệ!");

        settings::set(
            config.pool(),
            "allowed_email_domains",
            "@student.university.edu.vn,@example.com",
        )
        .await
        .unwrap();

        let verdict = validate_student(config.pool(), &draft).await.unwrap();
        assert_eq!(verdict, None);
    }

    #[tokio::test]
    async fn broken_config_is_an_error_not_a_reason() {
        let config = Config::new_test().await.unwrap();
        settings::set(config.pool(), "phone_pattern", "([bad").await.unwrap();

        assert!(validate_student(config.pool(), &valid_draft()).await.is_err());
    }
}
