use clap::{Parser, Subcommand};

use super::commands::category::CategoryCommands;
use super::commands::config::ConfigCommands;
use super::commands::student::StudentCommands;

#[derive(Parser)]
#[command(name = "student-cli")]
#[command(about = "A CLI tool for managing student records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Student record management
    Student(StudentCommands),
    /// Category option management (faculty / status / program)
    Category(CategoryCommands),
    /// Validation rule configuration
    Config(ConfigCommands),
}
