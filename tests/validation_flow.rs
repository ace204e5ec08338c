//! End-to-end flow: seed, validate, store, transition, delete.

use student_cli::config::models::StudentDraft;
use student_cli::config::repository::settings;
use student_cli::config::{CatalogError, Config};
use student_cli::validation::{self, Ruleset, TransitionPolicy, deletion};

fn draft() -> StudentDraft {
    StudentDraft {
        mssv: "SV2024001".to_string(),
        name: "Trần Thị Bích".to_string(),
        dob: "29/02/2004".to_string(),
        gender: "Nữ".to_string(),
        faculty: "Khoa Tiếng Nhật".to_string(),
        course: "K48".to_string(),
        program: "Cử nhân".to_string(),
        address: "TP. Hồ Chí Minh".to_string(),
        email: "bich.tt@student.university.edu.vn".to_string(),
        phone: "+84912345678".to_string(),
        status: "Đang học".to_string(),
    }
}

#[tokio::test]
async fn validate_then_insert_then_delete_within_window() {
    let config = Config::new_test().await.unwrap();

    let verdict = validation::validate_student(config.pool(), &draft()).await.unwrap();
    assert_eq!(verdict, None);

    config.insert_student(&draft()).await.unwrap();
    let stored = config.get_student("SV2024001").await.unwrap().unwrap();
    assert_eq!(stored.faculty.as_deref(), Some("Khoa Tiếng Nhật"));

    // Freshly created, so inside the 30 minute window
    assert!(deletion::can_delete(config.pool(), "SV2024001").await.unwrap());
    config.delete_student("SV2024001").await.unwrap();
    assert!(config.get_student("SV2024001").await.unwrap().is_none());
}

#[tokio::test]
async fn status_change_follows_the_configured_table() {
    let config = Config::new_test().await.unwrap();
    config.insert_student(&draft()).await.unwrap();

    let rules = Ruleset::load(config.pool()).await.unwrap();
    let policy = TransitionPolicy::new(&rules);

    // "Đang học" -> "Bảo lưu" is in the seeded table
    assert!(policy.is_allowed("Đang học", "Bảo lưu"));
    config.set_student_status("SV2024001", "Bảo lưu").await.unwrap();

    // "Bảo lưu" -> "Tốt nghiệp" is not
    let stored = config.get_student("SV2024001").await.unwrap().unwrap();
    assert_eq!(stored.status.as_deref(), Some("Bảo lưu"));
    assert!(!policy.is_allowed("Bảo lưu", "Tốt nghiệp"));
}

#[tokio::test]
async fn kill_switch_disables_both_policies() {
    let config = Config::new_test().await.unwrap();
    settings::set(config.pool(), "enable_rules", "false").await.unwrap();

    let rules = Ruleset::load(config.pool()).await.unwrap();
    assert!(TransitionPolicy::new(&rules).is_allowed("Tốt nghiệp", "Đang học"));

    config.insert_student(&draft()).await.unwrap();
    assert!(deletion::can_delete(config.pool(), "SV2024001").await.unwrap());
}

#[tokio::test]
async fn referential_guard_blocks_category_removal() {
    let config = Config::new_test().await.unwrap();
    config.insert_student(&draft()).await.unwrap();

    let err = config
        .remove_option("faculty", "Khoa Tiếng Nhật")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::ValueInUse { .. })
    ));

    // The record still validates against the surviving value
    let verdict = validation::validate_student(config.pool(), &draft()).await.unwrap();
    assert_eq!(verdict, None);
}

#[tokio::test]
async fn newly_added_option_is_usable_immediately() {
    let config = Config::new_test().await.unwrap();

    let mut record = draft();
    record.program = "Văn bằng 2".to_string();
    let verdict = validation::validate_student(config.pool(), &record).await.unwrap();
    assert_eq!(verdict.as_deref(), Some("Chương trình không hợp lệ!"));

    config.add_option("program", "Văn bằng 2").await.unwrap();
    let verdict = validation::validate_student(config.pool(), &record).await.unwrap();
    assert_eq!(verdict, None);

    config.remove_option("program", "Văn bằng 2").await.unwrap();
    let verdict = validation::validate_student(config.pool(), &record).await.unwrap();
    assert_eq!(verdict.as_deref(), Some("Chương trình không hợp lệ!"));
}
