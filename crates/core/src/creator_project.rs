//! Creator project lifecycle.
//!
//! ```text
//! draft -> submitted -> approved -> completed
//!              |    ^
//!              v    |
//!       revision_requested
//! ```
//! Any non-terminal status may also move to `cancelled`.

use crate::state_machine::{self, TransitionTable};

pub const PROJECT_DRAFT: &str = "draft";
pub const PROJECT_SUBMITTED: &str = "submitted";
pub const PROJECT_REVISION_REQUESTED: &str = "revision_requested";
pub const PROJECT_APPROVED: &str = "approved";
pub const PROJECT_COMPLETED: &str = "completed";
pub const PROJECT_CANCELLED: &str = "cancelled";

pub const PROJECT_STATUSES: &[&str] = &[
    PROJECT_DRAFT,
    PROJECT_SUBMITTED,
    PROJECT_REVISION_REQUESTED,
    PROJECT_APPROVED,
    PROJECT_COMPLETED,
    PROJECT_CANCELLED,
];

pub const TRANSITIONS: TransitionTable = &[
    (PROJECT_DRAFT, &[PROJECT_SUBMITTED, PROJECT_CANCELLED]),
    (
        PROJECT_SUBMITTED,
        &[PROJECT_APPROVED, PROJECT_REVISION_REQUESTED, PROJECT_CANCELLED],
    ),
    (PROJECT_REVISION_REQUESTED, &[PROJECT_SUBMITTED, PROJECT_CANCELLED]),
    (PROJECT_APPROVED, &[PROJECT_COMPLETED, PROJECT_CANCELLED]),
    (PROJECT_COMPLETED, &[]),
    (PROJECT_CANCELLED, &[]),
];

/// Statuses in which the project's content fields may still be edited.
pub const EDITABLE_STATUSES: &[&str] = &[PROJECT_DRAFT, PROJECT_REVISION_REQUESTED];

pub fn validate_transition(from: &str, to: &str) -> Result<(), String> {
    state_machine::validate_transition("Creator project", TRANSITIONS, from, to)
}

/// Statuses from which `to` is reachable.
pub fn sources_of(to: &str) -> Vec<&'static str> {
    state_machine::sources_of(TRANSITIONS, to)
}

pub fn is_editable(status: &str) -> bool {
    EDITABLE_STATUSES.contains(&status)
}

pub fn validate_budget(budget_cents: i64) -> Result<(), String> {
    if budget_cents < 0 {
        return Err("budget_cents must not be negative".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        assert!(validate_transition(PROJECT_DRAFT, PROJECT_SUBMITTED).is_ok());
        assert!(validate_transition(PROJECT_SUBMITTED, PROJECT_APPROVED).is_ok());
        assert!(validate_transition(PROJECT_APPROVED, PROJECT_COMPLETED).is_ok());
    }

    #[test]
    fn revision_loop() {
        assert!(validate_transition(PROJECT_SUBMITTED, PROJECT_REVISION_REQUESTED).is_ok());
        assert!(validate_transition(PROJECT_REVISION_REQUESTED, PROJECT_SUBMITTED).is_ok());
    }

    #[test]
    fn cannot_skip_review() {
        assert!(validate_transition(PROJECT_DRAFT, PROJECT_APPROVED).is_err());
        assert!(validate_transition(PROJECT_DRAFT, PROJECT_COMPLETED).is_err());
        assert!(validate_transition(PROJECT_SUBMITTED, PROJECT_COMPLETED).is_err());
    }

    #[test]
    fn terminal_states_are_final() {
        for to in PROJECT_STATUSES {
            assert!(validate_transition(PROJECT_COMPLETED, to).is_err());
            assert!(validate_transition(PROJECT_CANCELLED, to).is_err());
        }
    }

    #[test]
    fn cancel_sources_exclude_terminal() {
        let sources = sources_of(PROJECT_CANCELLED);
        assert_eq!(sources.len(), 4);
        assert!(!sources.contains(&PROJECT_COMPLETED));
    }

    #[test]
    fn editable_only_before_submission() {
        assert!(is_editable(PROJECT_DRAFT));
        assert!(is_editable(PROJECT_REVISION_REQUESTED));
        assert!(!is_editable(PROJECT_SUBMITTED));
        assert!(!is_editable(PROJECT_APPROVED));
    }

    #[test]
    fn negative_budget_rejected() {
        assert!(validate_budget(-1).is_err());
        assert!(validate_budget(0).is_ok());
    }
}
