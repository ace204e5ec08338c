//! Status transition state machine
//!
//! States are the status names themselves (an open vocabulary, managed
//! through the status category); the edges come from the JSON table under
//! the `status_transitions` config key.

use super::ruleset::Ruleset;

/// Permitted status changes. Strictly table-driven: an identity
/// transition ("Đang học" -> "Đang học") is allowed only when the table
/// lists it, and a status missing from the table has no outgoing
/// transitions at all.
pub struct TransitionPolicy<'a> {
    rules: &'a Ruleset,
}

impl<'a> TransitionPolicy<'a> {
    pub fn new(rules: &'a Ruleset) -> Self {
        Self { rules }
    }

    /// Whether a record may move from `old_status` to `new_status`.
    /// With `enable_rules` off this always passes, as an administrator
    /// escape hatch.
    pub fn is_allowed(&self, old_status: &str, new_status: &str) -> bool {
        if !self.rules.rules_enabled {
            return true;
        }
        match self.rules.transitions.get(old_status) {
            Some(targets) => targets.iter().any(|t| t == new_status),
            None => false,
        }
    }
}
