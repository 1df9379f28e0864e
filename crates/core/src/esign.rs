//! E-signature workflow rules.
//!
//! Two coupled state machines:
//!
//! ```text
//! signer:   pending -> viewed -> signed
//!              \         \
//!               +---------+--> declined
//!
//! document: pending -> in_progress -> completed
//!              \            \
//!               +------------+--> declined | voided
//! ```
//!
//! Signers sign in ascending `signing_order`; signers that share an order
//! may sign in any order relative to each other.

use std::collections::HashSet;

use crate::creator::validate_email;
use crate::state_machine::{self, TransitionTable};

pub const SIGNER_PENDING: &str = "pending";
pub const SIGNER_VIEWED: &str = "viewed";
pub const SIGNER_SIGNED: &str = "signed";
pub const SIGNER_DECLINED: &str = "declined";

pub const SIGNER_TRANSITIONS: TransitionTable = &[
    (SIGNER_PENDING, &[SIGNER_VIEWED, SIGNER_SIGNED, SIGNER_DECLINED]),
    (SIGNER_VIEWED, &[SIGNER_SIGNED, SIGNER_DECLINED]),
    (SIGNER_SIGNED, &[]),
    (SIGNER_DECLINED, &[]),
];

pub const DOCUMENT_PENDING: &str = "pending";
pub const DOCUMENT_IN_PROGRESS: &str = "in_progress";
pub const DOCUMENT_COMPLETED: &str = "completed";
pub const DOCUMENT_DECLINED: &str = "declined";
pub const DOCUMENT_VOIDED: &str = "voided";

pub const DOCUMENT_STATUSES: &[&str] = &[
    DOCUMENT_PENDING,
    DOCUMENT_IN_PROGRESS,
    DOCUMENT_COMPLETED,
    DOCUMENT_DECLINED,
    DOCUMENT_VOIDED,
];

pub const DOCUMENT_TRANSITIONS: TransitionTable = &[
    (
        DOCUMENT_PENDING,
        &[
            DOCUMENT_IN_PROGRESS,
            DOCUMENT_COMPLETED,
            DOCUMENT_DECLINED,
            DOCUMENT_VOIDED,
        ],
    ),
    (
        DOCUMENT_IN_PROGRESS,
        &[DOCUMENT_COMPLETED, DOCUMENT_DECLINED, DOCUMENT_VOIDED],
    ),
    (DOCUMENT_COMPLETED, &[]),
    (DOCUMENT_DECLINED, &[]),
    (DOCUMENT_VOIDED, &[]),
];

/// Document statuses in which signers may still act.
pub const OPEN_DOCUMENT_STATUSES: &[&str] = &[DOCUMENT_PENDING, DOCUMENT_IN_PROGRESS];

/// Signer statuses from which a signature or decline is accepted.
pub const ACTIONABLE_SIGNER_STATUSES: &[&str] = &[SIGNER_PENDING, SIGNER_VIEWED];

// Audit actions.
pub const AUDIT_CREATED: &str = "created";
pub const AUDIT_VIEWED: &str = "viewed";
pub const AUDIT_SIGNED: &str = "signed";
pub const AUDIT_DECLINED: &str = "declined";
pub const AUDIT_COMPLETED: &str = "completed";
pub const AUDIT_VOIDED: &str = "voided";

/// Upper bound on signers per document.
pub const MAX_SIGNERS: usize = 20;

/// Signer as supplied when a document is created.
#[derive(Debug, Clone)]
pub struct SignerSpec<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub signing_order: i32,
}

/// The fields of an existing signer that ordering checks need.
#[derive(Debug, Clone, Copy)]
pub struct SignerState<'a> {
    pub id: i64,
    pub signing_order: i32,
    pub status: &'a str,
}

pub fn validate_signer_transition(from: &str, to: &str) -> Result<(), String> {
    state_machine::validate_transition("Signer", SIGNER_TRANSITIONS, from, to)
}

pub fn validate_document_transition(from: &str, to: &str) -> Result<(), String> {
    state_machine::validate_transition("Document", DOCUMENT_TRANSITIONS, from, to)
}

pub fn is_document_open(status: &str) -> bool {
    OPEN_DOCUMENT_STATUSES.contains(&status)
}

/// Validate the signer list of a new document: 1..=MAX_SIGNERS entries,
/// non-empty names, valid and case-insensitively unique emails, orders >= 1.
pub fn validate_signers(signers: &[SignerSpec<'_>]) -> Result<(), String> {
    if signers.is_empty() {
        return Err("A document needs at least one signer".into());
    }
    if signers.len() > MAX_SIGNERS {
        return Err(format!("A document may have at most {MAX_SIGNERS} signers"));
    }
    let mut seen = HashSet::new();
    for signer in signers {
        if signer.name.trim().is_empty() {
            return Err("Signer name must not be empty".into());
        }
        validate_email(signer.email)?;
        if signer.signing_order < 1 {
            return Err(format!(
                "signing_order for {} must be at least 1",
                signer.email
            ));
        }
        if !seen.insert(signer.email.trim().to_lowercase()) {
            return Err(format!("Duplicate signer email: {}", signer.email));
        }
    }
    Ok(())
}

/// Check that every signer ordered before `signer_id` has signed.
pub fn check_signing_order(signer_id: i64, signers: &[SignerState<'_>]) -> Result<(), String> {
    let Some(me) = signers.iter().find(|s| s.id == signer_id) else {
        return Err(format!("Signer {signer_id} does not belong to this document"));
    };
    let waiting_on = signers
        .iter()
        .filter(|s| s.signing_order < me.signing_order && s.status != SIGNER_SIGNED)
        .count();
    if waiting_on > 0 {
        return Err(format!(
            "Waiting on {waiting_on} earlier signer(s) before this signer can sign"
        ));
    }
    Ok(())
}

/// Document status after `signer_id` signs, given the signer states
/// *before* the signature is recorded.
pub fn document_status_after_signature(
    signer_id: i64,
    signers: &[SignerState<'_>],
) -> &'static str {
    let all_signed = signers
        .iter()
        .all(|s| s.id == signer_id || s.status == SIGNER_SIGNED);
    if all_signed {
        DOCUMENT_COMPLETED
    } else {
        DOCUMENT_IN_PROGRESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec<'a>(email: &'a str, order: i32) -> SignerSpec<'a> {
        SignerSpec {
            name: "Signer",
            email,
            signing_order: order,
        }
    }

    fn state(id: i64, order: i32, status: &str) -> SignerState<'_> {
        SignerState {
            id,
            signing_order: order,
            status,
        }
    }

    #[test]
    fn signer_lifecycle() {
        assert!(validate_signer_transition(SIGNER_PENDING, SIGNER_VIEWED).is_ok());
        assert!(validate_signer_transition(SIGNER_VIEWED, SIGNER_SIGNED).is_ok());
        assert!(validate_signer_transition(SIGNER_PENDING, SIGNER_DECLINED).is_ok());
        assert!(validate_signer_transition(SIGNER_SIGNED, SIGNER_DECLINED).is_err());
        assert!(validate_signer_transition(SIGNER_DECLINED, SIGNER_SIGNED).is_err());
        assert!(validate_signer_transition(SIGNER_VIEWED, SIGNER_PENDING).is_err());
    }

    #[test]
    fn document_lifecycle() {
        assert!(validate_document_transition(DOCUMENT_PENDING, DOCUMENT_IN_PROGRESS).is_ok());
        assert!(validate_document_transition(DOCUMENT_IN_PROGRESS, DOCUMENT_COMPLETED).is_ok());
        assert!(validate_document_transition(DOCUMENT_IN_PROGRESS, DOCUMENT_VOIDED).is_ok());
        assert!(validate_document_transition(DOCUMENT_COMPLETED, DOCUMENT_VOIDED).is_err());
        assert!(validate_document_transition(DOCUMENT_VOIDED, DOCUMENT_PENDING).is_err());
    }

    #[test]
    fn open_statuses() {
        assert!(is_document_open(DOCUMENT_PENDING));
        assert!(is_document_open(DOCUMENT_IN_PROGRESS));
        assert!(!is_document_open(DOCUMENT_COMPLETED));
        assert!(!is_document_open(DOCUMENT_VOIDED));
    }

    #[test]
    fn signer_list_validation() {
        assert!(validate_signers(&[]).is_err());
        assert!(validate_signers(&[spec("a@x.com", 1), spec("b@x.com", 2)]).is_ok());
        assert!(validate_signers(&[spec("a@x.com", 0)]).is_err());
        assert!(validate_signers(&[spec("not-an-email", 1)]).is_err());
        let dup = validate_signers(&[spec("a@x.com", 1), spec("A@X.com", 2)]).unwrap_err();
        assert!(dup.contains("Duplicate"));
    }

    #[test]
    fn signer_list_too_long() {
        let emails: Vec<String> = (0..=MAX_SIGNERS).map(|i| format!("s{i}@x.com")).collect();
        let specs: Vec<SignerSpec<'_>> = emails.iter().map(|e| spec(e, 1)).collect();
        assert!(validate_signers(&specs).is_err());
    }

    #[test]
    fn first_in_order_may_sign() {
        let signers = [state(1, 1, SIGNER_PENDING), state(2, 2, SIGNER_PENDING)];
        assert!(check_signing_order(1, &signers).is_ok());
    }

    #[test]
    fn later_signer_waits_for_earlier() {
        let signers = [state(1, 1, SIGNER_VIEWED), state(2, 2, SIGNER_PENDING)];
        let err = check_signing_order(2, &signers).unwrap_err();
        assert!(err.contains("1 earlier signer"));
    }

    #[test]
    fn same_order_signers_are_parallel() {
        let signers = [state(1, 1, SIGNER_PENDING), state(2, 1, SIGNER_PENDING)];
        assert!(check_signing_order(2, &signers).is_ok());
    }

    #[test]
    fn unknown_signer_rejected() {
        let signers = [state(1, 1, SIGNER_PENDING)];
        assert!(check_signing_order(9, &signers).is_err());
    }

    #[test]
    fn last_signature_completes_document() {
        let signers = [state(1, 1, SIGNER_SIGNED), state(2, 2, SIGNER_VIEWED)];
        assert_eq!(document_status_after_signature(2, &signers), DOCUMENT_COMPLETED);
    }

    #[test]
    fn partial_signature_moves_to_in_progress() {
        let signers = [state(1, 1, SIGNER_PENDING), state(2, 2, SIGNER_PENDING)];
        assert_eq!(document_status_after_signature(1, &signers), DOCUMENT_IN_PROGRESS);
    }

    #[test]
    fn single_signer_completes_immediately() {
        let signers = [state(7, 1, SIGNER_PENDING)];
        assert_eq!(document_status_after_signature(7, &signers), DOCUMENT_COMPLETED);
    }
}
