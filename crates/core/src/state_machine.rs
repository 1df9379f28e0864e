//! Table-driven status transitions.
//!
//! Each entity module declares its legal transitions as a static table of
//! `(from, &[to])` pairs. Statuses are stored as lowercase TEXT columns.

/// A transition table: each entry lists the statuses reachable from `from`.
pub type TransitionTable = &'static [(&'static str, &'static [&'static str])];

/// Returns the statuses reachable from `from`. Unknown and terminal
/// statuses return an empty slice.
pub fn valid_transitions(table: TransitionTable, from: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(status, _)| *status == from)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

/// Check whether `from -> to` appears in the table.
pub fn can_transition(table: TransitionTable, from: &str, to: &str) -> bool {
    valid_transitions(table, from).contains(&to)
}

/// Validate a transition, returning a human-readable error for invalid ones.
pub fn validate_transition(
    entity: &str,
    table: TransitionTable,
    from: &str,
    to: &str,
) -> Result<(), String> {
    if can_transition(table, from, to) {
        Ok(())
    } else {
        Err(format!("{entity} cannot move from '{from}' to '{to}'"))
    }
}

/// Every status that can transition into `to`. Used to build
/// `WHERE status = ANY($n)` predicates for conditional updates.
pub fn sources_of(table: TransitionTable, to: &str) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(_, targets)| targets.contains(&to))
        .map(|(from, _)| *from)
        .collect()
}

/// Validate that `status` is one of `allowed`.
pub fn validate_status(entity: &str, allowed: &[&str], status: &str) -> Result<(), String> {
    if allowed.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {entity} status '{status}'. Must be one of: {}",
            allowed.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: TransitionTable = &[
        ("open", &["closed", "held"]),
        ("held", &["open", "closed"]),
        ("closed", &[]),
    ];

    #[test]
    fn listed_transition_is_valid() {
        assert!(can_transition(TABLE, "open", "held"));
        assert!(validate_transition("Ticket", TABLE, "held", "closed").is_ok());
    }

    #[test]
    fn terminal_status_has_no_targets() {
        assert!(valid_transitions(TABLE, "closed").is_empty());
    }

    #[test]
    fn unknown_status_has_no_targets() {
        assert!(valid_transitions(TABLE, "bogus").is_empty());
    }

    #[test]
    fn invalid_transition_message_names_both_states() {
        let err = validate_transition("Ticket", TABLE, "closed", "open").unwrap_err();
        assert_eq!(err, "Ticket cannot move from 'closed' to 'open'");
    }

    #[test]
    fn sources_of_collects_all_predecessors() {
        let mut sources = sources_of(TABLE, "closed");
        sources.sort_unstable();
        assert_eq!(sources, vec!["held", "open"]);
    }

    #[test]
    fn validate_status_rejects_unknown() {
        let err = validate_status("ticket", &["open", "closed"], "gone").unwrap_err();
        assert!(err.contains("open, closed"));
    }
}
