//! Field-level checks
//!
//! Each check takes one raw field value and answers with a bool.
//! Malformed input is never an error here, it is simply invalid;
//! malformed *configuration* is caught earlier, in [`Ruleset::load`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::ruleset::Ruleset;

/// General address shape: word characters, dots and hyphens on both sides
/// of a single `@`, domain ending in an alphabetic top-level segment.
/// The shape is fixed; only the domain whitelist is configurable.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.[A-Za-z]+$").unwrap());

impl Ruleset {
    /// The address must have a plausible shape AND end in one of the
    /// configured suffixes (case-sensitive). Either failing invalidates it.
    pub fn is_valid_email(&self, email: &str) -> bool {
        if !EMAIL_SHAPE.is_match(email) {
            return false;
        }
        self.allowed_email_domains
            .iter()
            .any(|domain| email.ends_with(domain.as_str()))
    }

    /// The number must match the configured pattern over its full length,
    /// not just a prefix or substring.
    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone_pattern
            .find(phone)
            .is_some_and(|m| m.start() == 0 && m.end() == phone.len())
    }
}

/// Strict `dd/mm/yyyy` parse. chrono rejects impossible calendar dates,
/// so 29/02 passes only in leap years. Zero-padding is optional.
pub fn is_valid_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%d/%m/%Y").is_ok()
}
