//! Familiarity scoring for AI agent relationships.
//!
//! ```text
//! score = W_COUNT   * min(1, ln(1 + n) / ln(1 + COUNT_SATURATION))
//!       + W_MINUTES * min(1, ln(1 + m) / ln(1 + MINUTES_SATURATION))
//!       + W_RECENCY * exp(-ln 2 * days_since_last / HALF_LIFE_DAYS)
//! ```
//!
//! clamped to `[0, 1]`. The same expression is rendered as SQL by
//! [`score_sql`] so the decay job and the interaction upsert compute it in
//! a single statement.

use crate::types::Timestamp;

pub const WEIGHT_COUNT: f64 = 0.4;
pub const WEIGHT_MINUTES: f64 = 0.3;
pub const WEIGHT_RECENCY: f64 = 0.3;

/// Interaction count at which the count term saturates.
pub const COUNT_SATURATION: f64 = 100.0;
/// Conversation minutes at which the minutes term saturates.
pub const MINUTES_SATURATION: f64 = 600.0;
/// Days for the recency term to halve.
pub const HALF_LIFE_DAYS: f64 = 30.0;

/// Longest single interaction accepted, in minutes.
pub const MAX_INTERACTION_MINUTES: f64 = 24.0 * 60.0;

pub const PERSON_CREATOR: &str = "creator";
pub const PERSON_CUSTOMER: &str = "customer";
pub const PERSON_TEAM_MEMBER: &str = "team_member";
pub const PERSON_TYPES: &[&str] = &[PERSON_CREATOR, PERSON_CUSTOMER, PERSON_TEAM_MEMBER];

const SECONDS_PER_DAY: f64 = 86_400.0;

fn saturating_log(value: f64, saturation: f64) -> f64 {
    ((1.0 + value.max(0.0)).ln() / (1.0 + saturation).ln()).min(1.0)
}

/// Compute the score from raw inputs. `days_since_last` below zero (clock
/// skew) is treated as zero.
pub fn score(interaction_count: i64, conversation_minutes: f64, days_since_last: f64) -> f64 {
    let count_term = saturating_log(interaction_count as f64, COUNT_SATURATION);
    let minutes_term = saturating_log(conversation_minutes, MINUTES_SATURATION);
    let recency = (-std::f64::consts::LN_2 * days_since_last.max(0.0) / HALF_LIFE_DAYS).exp();

    let raw = WEIGHT_COUNT * count_term + WEIGHT_MINUTES * minutes_term + WEIGHT_RECENCY * recency;
    raw.clamp(0.0, 1.0)
}

/// Score for a relationship as of `now`. A relationship with no recorded
/// interaction gets no recency credit.
pub fn score_at(
    interaction_count: i64,
    conversation_minutes: f64,
    last_interaction_at: Option<Timestamp>,
    now: Timestamp,
) -> f64 {
    match last_interaction_at {
        Some(last) => {
            let days = (now - last).num_seconds() as f64 / SECONDS_PER_DAY;
            score(interaction_count, conversation_minutes, days)
        }
        None => {
            let without_recency = score(interaction_count, conversation_minutes, 0.0) - WEIGHT_RECENCY;
            without_recency.clamp(0.0, 1.0)
        }
    }
}

/// Render the score as a PostgreSQL expression over the given column
/// expressions. `last` must evaluate to a `TIMESTAMPTZ`; `NULL` yields no
/// recency credit, matching [`score_at`].
pub fn score_sql(count: &str, minutes: &str, last: &str) -> String {
    format!(
        "GREATEST(0.0, LEAST(1.0, \
            {WEIGHT_COUNT} * LEAST(1.0, LN(1.0 + GREATEST({count}, 0)) / LN(1.0 + {COUNT_SATURATION})) \
          + {WEIGHT_MINUTES} * LEAST(1.0, LN(1.0 + GREATEST({minutes}, 0)) / LN(1.0 + {MINUTES_SATURATION})) \
          + {WEIGHT_RECENCY} * COALESCE(EXP(-LN(2.0) * GREATEST(EXTRACT(EPOCH FROM (NOW() - {last})), 0) \
              / {SECONDS_PER_DAY} / {HALF_LIFE_DAYS}), 0.0)))"
    )
}

pub fn validate_person_type(person_type: &str) -> Result<(), String> {
    crate::state_machine::validate_status("person", PERSON_TYPES, person_type)
}

pub fn validate_duration(minutes: f64) -> Result<(), String> {
    if !minutes.is_finite() || minutes < 0.0 {
        return Err("duration_minutes must be a non-negative number".into());
    }
    if minutes > MAX_INTERACTION_MINUTES {
        return Err(format!(
            "duration_minutes must not exceed {MAX_INTERACTION_MINUTES}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn weights_sum_to_one() {
        assert!(close(WEIGHT_COUNT + WEIGHT_MINUTES + WEIGHT_RECENCY, 1.0));
    }

    #[test]
    fn fresh_relationship_has_only_recency() {
        assert!(close(score(0, 0.0, 0.0), WEIGHT_RECENCY));
    }

    #[test]
    fn saturated_and_recent_is_one() {
        assert!(close(score(100, 600.0, 0.0), 1.0));
        assert!(close(score(10_000, 1e6, 0.0), 1.0));
    }

    #[test]
    fn recency_halves_after_half_life() {
        let now = score(0, 0.0, 0.0);
        let later = score(0, 0.0, HALF_LIFE_DAYS);
        assert!(close(later, now / 2.0));
    }

    #[test]
    fn score_is_monotonic_in_each_input() {
        assert!(score(5, 30.0, 3.0) < score(6, 30.0, 3.0));
        assert!(score(5, 30.0, 3.0) < score(5, 31.0, 3.0));
        assert!(score(5, 30.0, 3.0) > score(5, 30.0, 4.0));
    }

    #[test]
    fn negative_inputs_are_floored() {
        assert!(close(score(-3, -10.0, -5.0), score(0, 0.0, 0.0)));
    }

    #[test]
    fn score_stays_in_unit_interval() {
        for n in [0, 1, 10, 1000] {
            for m in [0.0, 5.0, 10_000.0] {
                for d in [0.0, 1.0, 365.0] {
                    let s = score(n, m, d);
                    assert!((0.0..=1.0).contains(&s), "score({n},{m},{d}) = {s}");
                }
            }
        }
    }

    #[test]
    fn score_at_uses_elapsed_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let last = now - Duration::days(30);
        assert!(close(score_at(10, 60.0, Some(last), now), score(10, 60.0, 30.0)));
    }

    #[test]
    fn score_at_without_interaction_has_no_recency() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(close(score_at(0, 0.0, None, now), 0.0));
    }

    #[test]
    fn sql_expression_references_columns() {
        let sql = score_sql("interaction_count", "total_conversation_minutes", "last_interaction_at");
        assert!(sql.contains("LN(1.0 + GREATEST(interaction_count, 0))"));
        assert!(sql.contains("GREATEST(total_conversation_minutes, 0)"));
        assert!(sql.contains("NOW() - last_interaction_at"));
        assert!(sql.starts_with("GREATEST(0.0, LEAST(1.0,"));
    }

    #[test]
    fn duration_validation() {
        assert!(validate_duration(0.0).is_ok());
        assert!(validate_duration(45.5).is_ok());
        assert!(validate_duration(-1.0).is_err());
        assert!(validate_duration(f64::NAN).is_err());
        assert!(validate_duration(MAX_INTERACTION_MINUTES + 1.0).is_err());
    }

    #[test]
    fn person_types() {
        assert!(validate_person_type(PERSON_CUSTOMER).is_ok());
        assert!(validate_person_type("robot").is_err());
    }
}
