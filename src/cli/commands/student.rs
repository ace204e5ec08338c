use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::models::{StudentDraft, StudentRecord};
use crate::config::{Config, RecordError};
use crate::validation::{self, Ruleset, TransitionPolicy, deletion};

#[derive(Args)]
pub struct StudentCommands {
    #[command(subcommand)]
    pub command: StudentSubcommands,
}

#[derive(Subcommand)]
pub enum StudentSubcommands {
    /// Validate and add a student record
    Add {
        /// Record as JSON (keys: mssv, name, dob, gender, faculty, course,
        /// program, address, email, phone, status)
        #[arg(long)]
        json: String,
    },
    /// Show a student by MSSV
    Show {
        mssv: String,
    },
    /// Change a student's status, subject to the transition rules
    SetStatus {
        mssv: String,
        new_status: String,
    },
    /// Delete a student, subject to the deletion time window
    Delete {
        mssv: String,
    },
    /// Search students by faculty and/or partial name
    Search {
        #[arg(long)]
        faculty: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

pub async fn student_command(args: StudentCommands, config: &Config) -> Result<()> {
    match args.command {
        StudentSubcommands::Add { json } => {
            let draft: StudentDraft =
                serde_json::from_str(&json).context("Student record is not valid JSON")?;

            match validation::validate_student(config.pool(), &draft).await? {
                Some(reason) => println!("✗ {}", reason),
                None => {
                    config.insert_student(&draft).await?;
                    println!("✓ Đã thêm sinh viên {}", draft.mssv);
                }
            }
        }
        StudentSubcommands::Show { mssv } => match config.get_student(&mssv).await? {
            Some(student) => print_student(&student),
            None => println!("Không tìm thấy sinh viên!"),
        },
        StudentSubcommands::SetStatus { mssv, new_status } => {
            let student = config
                .get_student(&mssv)
                .await?
                .ok_or_else(|| RecordError::StudentNotFound(mssv.clone()))?;
            let old_status = student.status.unwrap_or_default();

            let rules = Ruleset::load(config.pool()).await?;
            if TransitionPolicy::new(&rules).is_allowed(&old_status, &new_status) {
                config.set_student_status(&mssv, &new_status).await?;
                println!("✓ Đã chuyển tình trạng của {}: '{}' → '{}'", mssv, old_status, new_status);
            } else {
                println!(
                    "✗ Không thể chuyển tình trạng từ '{}' sang '{}'",
                    old_status, new_status
                );
            }
        }
        StudentSubcommands::Delete { mssv } => {
            if deletion::can_delete(config.pool(), &mssv).await? {
                config.delete_student(&mssv).await?;
                println!("✓ Đã xóa sinh viên {}", mssv);
            } else {
                println!("✗ Đã quá thời hạn cho phép xóa sinh viên {}", mssv);
            }
        }
        StudentSubcommands::Search { faculty, name } => {
            if faculty.is_none() && name.is_none() {
                println!("Vui lòng nhập ít nhất một điều kiện tìm kiếm!");
                return Ok(());
            }
            let results = config
                .search_students(faculty.as_deref(), name.as_deref())
                .await?;
            if results.is_empty() {
                println!("Không tìm thấy kết quả nào!");
            } else {
                for student in &results {
                    println!(
                        "{}  {}  {}  {}",
                        student.mssv,
                        student.name,
                        student.faculty.as_deref().unwrap_or("-"),
                        student.status.as_deref().unwrap_or("-")
                    );
                }
                println!("({} kết quả)", results.len());
            }
        }
    }

    Ok(())
}

fn print_student(student: &StudentRecord) {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    println!("MSSV:           {}", student.mssv);
    println!("Họ Tên:         {}", student.name);
    println!("Ngày sinh:      {}", field(&student.dob));
    println!("Giới tính:      {}", field(&student.gender));
    println!("Khoa:           {}", field(&student.faculty));
    println!("Khóa:           {}", field(&student.course));
    println!("Chương trình:   {}", field(&student.program));
    println!("Địa chỉ:        {}", field(&student.address));
    println!("Email:          {}", field(&student.email));
    println!("Số điện thoại:  {}", field(&student.phone));
    println!("Tình trạng:     {}", field(&student.status));
}
