//! Contractor draw request lifecycle.
//!
//! A draw request is a contractor asking to be paid out. Review happens
//! only while it is `pending`; payment only once `approved`.

use crate::state_machine::{self, TransitionTable};
use crate::types::Cents;

pub const DRAW_PENDING: &str = "pending";
pub const DRAW_APPROVED: &str = "approved";
pub const DRAW_REJECTED: &str = "rejected";
pub const DRAW_PAID: &str = "paid";
pub const DRAW_CANCELLED: &str = "cancelled";

pub const DRAW_STATUSES: &[&str] = &[
    DRAW_PENDING,
    DRAW_APPROVED,
    DRAW_REJECTED,
    DRAW_PAID,
    DRAW_CANCELLED,
];

pub const TRANSITIONS: TransitionTable = &[
    (DRAW_PENDING, &[DRAW_APPROVED, DRAW_REJECTED, DRAW_CANCELLED]),
    (DRAW_APPROVED, &[DRAW_PAID]),
    (DRAW_REJECTED, &[]),
    (DRAW_PAID, &[]),
    (DRAW_CANCELLED, &[]),
];

/// Upper bound for a single draw: $1,000,000.00.
pub const MAX_DRAW_CENTS: Cents = 100_000_000;

pub fn validate_transition(from: &str, to: &str) -> Result<(), String> {
    state_machine::validate_transition("Draw request", TRANSITIONS, from, to)
}

pub fn validate_amount(amount_cents: Cents) -> Result<(), String> {
    if amount_cents <= 0 {
        return Err("amount_cents must be greater than zero".into());
    }
    if amount_cents > MAX_DRAW_CENTS {
        return Err(format!("amount_cents must not exceed {MAX_DRAW_CENTS}"));
    }
    Ok(())
}
