pub mod category;
pub mod config;
pub mod student;

pub use category::{CategoryCommands, category_command};
pub use config::{ConfigCommands, config_command};
pub use student::{StudentCommands, student_command};
