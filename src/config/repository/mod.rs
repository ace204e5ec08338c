//! Repository layer for database operations

pub mod catalog;
pub mod settings;
pub mod students;
