//! Configuration-driven validation rules
//!
//! Everything here is driven by the `config` and `settings` tables rather
//! than hardcoded: which email domains are acceptable, what a phone number
//! looks like, which status transitions are permitted and for how long a
//! record may be deleted. Rules are re-read from the database on each
//! check so interactive configuration edits take effect immediately.

pub mod deletion;
pub mod fields;
pub mod record;
pub mod ruleset;
pub mod transition;

pub use deletion::DeletionWindowPolicy;
pub use record::validate_student;
pub use ruleset::{ConfigError, Ruleset};
pub use transition::TransitionPolicy;
