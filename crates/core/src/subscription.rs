//! Subscription billing-cycle arithmetic and lifecycle.
//!
//! Billing frequency maps to a fixed day interval; every date operation
//! (create, skip, resume, reschedule) is a single date addition against
//! that table.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::state_machine::{self, TransitionTable};

pub const SUBSCRIPTION_ACTIVE: &str = "active";
pub const SUBSCRIPTION_PAUSED: &str = "paused";
pub const SUBSCRIPTION_CANCELLED: &str = "cancelled";

pub const SUBSCRIPTION_STATUSES: &[&str] = &[
    SUBSCRIPTION_ACTIVE,
    SUBSCRIPTION_PAUSED,
    SUBSCRIPTION_CANCELLED,
];

pub const TRANSITIONS: TransitionTable = &[
    (SUBSCRIPTION_ACTIVE, &[SUBSCRIPTION_PAUSED, SUBSCRIPTION_CANCELLED]),
    (SUBSCRIPTION_PAUSED, &[SUBSCRIPTION_ACTIVE, SUBSCRIPTION_CANCELLED]),
    (SUBSCRIPTION_CANCELLED, &[]),
];

/// Statuses in which the schedule (date or frequency) may be changed.
pub const SCHEDULABLE_STATUSES: &[&str] = &[SUBSCRIPTION_ACTIVE, SUBSCRIPTION_PAUSED];

/// Furthest a subscription may be rescheduled into the future.
pub const MAX_RESCHEDULE_DAYS: i64 = 365;

/// Maximum quantity per subscription line.
pub const MAX_QUANTITY: i32 = 99;

/// Delivery frequency of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Bimonthly,
        Frequency::Quarterly,
    ];

    /// Days between two billings.
    pub fn interval_days(self) -> i64 {
        match self {
            Frequency::Weekly => 7,
            Frequency::Biweekly => 14,
            Frequency::Monthly => 30,
            Frequency::Bimonthly => 60,
            Frequency::Quarterly => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Quarterly => "quarterly",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                format!(
                    "Invalid frequency '{value}'. Must be one of: {}",
                    names.join(", ")
                )
            })
    }

    /// `date` advanced by one interval, or an error past the calendar's end.
    pub fn advance(self, date: NaiveDate) -> Result<NaiveDate, String> {
        date.checked_add_signed(Duration::days(self.interval_days()))
            .ok_or_else(|| format!("Billing date {date} cannot be advanced by {self}"))
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_transition(from: &str, to: &str) -> Result<(), String> {
    state_machine::validate_transition("Subscription", TRANSITIONS, from, to)
}

/// First billing date for a new subscription.
///
/// An explicit start date must lie between today and
/// [`MAX_RESCHEDULE_DAYS`] ahead; without one the first billing is one
/// interval from today.
pub fn initial_billing_date(
    start_date: Option<NaiveDate>,
    today: NaiveDate,
    frequency: Frequency,
) -> Result<NaiveDate, String> {
    match start_date {
        Some(date) if date < today => Err(format!(
            "start_date {date} is in the past (today is {today})"
        )),
        Some(date) if date > reschedule_limit(today)? => Err(format!(
            "start_date {date} is more than {MAX_RESCHEDULE_DAYS} days ahead"
        )),
        Some(date) => Ok(date),
        None => frequency.advance(today),
    }
}

/// Next billing date after skipping one delivery.
pub fn skip_date(current: NaiveDate, frequency: Frequency) -> Result<NaiveDate, String> {
    frequency.advance(current)
}

/// Next billing date when a paused subscription resumes.
///
/// A date that has already passed (or is today) would bill immediately, so
/// it restarts one interval from today; a future date is kept.
pub fn resume_date(
    current: NaiveDate,
    today: NaiveDate,
    frequency: Frequency,
) -> Result<NaiveDate, String> {
    if current <= today {
        frequency.advance(today)
    } else {
        Ok(current)
    }
}

fn reschedule_limit(today: NaiveDate) -> Result<NaiveDate, String> {
    today
        .checked_add_signed(Duration::days(MAX_RESCHEDULE_DAYS))
        .ok_or_else(|| format!("{today} is too close to the end of the calendar"))
}

/// Validate a manually chosen billing date: strictly after today and no
/// more than [`MAX_RESCHEDULE_DAYS`] ahead.
pub fn validate_reschedule(date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if date <= today {
        return Err(format!("Reschedule date {date} must be after {today}"));
    }
    if date > reschedule_limit(today)? {
        return Err(format!(
            "Reschedule date {date} is more than {MAX_RESCHEDULE_DAYS} days ahead"
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), String> {
    if (1..=MAX_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(format!("quantity must be between 1 and {MAX_QUANTITY}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_table() {
        let days: Vec<i64> = Frequency::ALL.iter().map(|f| f.interval_days()).collect();
        assert_eq!(days, vec![7, 14, 30, 60, 90]);
    }

    #[test]
    fn parse_round_trips_names() {
        for f in Frequency::ALL {
            assert_eq!(Frequency::parse(f.as_str()), Ok(f));
        }
        assert!(Frequency::parse("daily").is_err());
        assert!(Frequency::parse("Weekly").is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Frequency::Bimonthly).unwrap();
        assert_eq!(json, "\"bimonthly\"");
    }

    #[test]
    fn initial_date_defaults_to_one_interval_out() {
        let today = date(2026, 1, 28);
        let next = initial_billing_date(None, today, Frequency::Weekly).unwrap();
        assert_eq!(next, date(2026, 2, 4));
    }

    #[test]
    fn initial_date_accepts_today_and_future() {
        let today = date(2026, 3, 1);
        assert_eq!(
            initial_billing_date(Some(today), today, Frequency::Monthly),
            Ok(today)
        );
        assert_eq!(
            initial_billing_date(Some(date(2026, 4, 1)), today, Frequency::Monthly),
            Ok(date(2026, 4, 1))
        );
    }

    #[test]
    fn initial_date_rejects_past() {
        let today = date(2026, 3, 1);
        assert!(initial_billing_date(Some(date(2026, 2, 28)), today, Frequency::Monthly).is_err());
    }

    #[test]
    fn initial_date_is_capped_at_the_reschedule_limit() {
        let today = date(2026, 3, 1);
        let limit = today + Duration::days(MAX_RESCHEDULE_DAYS);
        assert_eq!(
            initial_billing_date(Some(limit), today, Frequency::Weekly),
            Ok(limit)
        );
        assert!(initial_billing_date(Some(limit + Duration::days(1)), today, Frequency::Weekly).is_err());
        assert!(initial_billing_date(Some(NaiveDate::MAX), today, Frequency::Quarterly).is_err());
    }

    #[test]
    fn advancing_past_the_calendar_end_is_an_error() {
        assert!(skip_date(NaiveDate::MAX, Frequency::Weekly).is_err());
        assert!(skip_date(NaiveDate::MAX - Duration::days(10), Frequency::Quarterly).is_err());
        assert!(resume_date(NaiveDate::MAX, NaiveDate::MAX, Frequency::Monthly).is_err());
        assert!(validate_reschedule(NaiveDate::MAX, NaiveDate::MAX - Duration::days(1)).is_err());
    }

    #[test]
    fn skip_crosses_month_and_leap_day() {
        assert_eq!(skip_date(date(2028, 2, 20), Frequency::Weekly), Ok(date(2028, 2, 27)));
        assert_eq!(skip_date(date(2028, 2, 25), Frequency::Weekly), Ok(date(2028, 3, 3)));
        assert_eq!(skip_date(date(2028, 1, 31), Frequency::Monthly), Ok(date(2028, 3, 1)));
        assert_eq!(skip_date(date(2026, 12, 15), Frequency::Quarterly), Ok(date(2027, 3, 15)));
    }

    #[test]
    fn resume_with_past_date_restarts_from_today() {
        let today = date(2026, 5, 10);
        assert_eq!(
            resume_date(date(2026, 4, 1), today, Frequency::Biweekly),
            Ok(date(2026, 5, 24))
        );
        // Due today counts as passed.
        assert_eq!(
            resume_date(today, today, Frequency::Weekly),
            Ok(date(2026, 5, 17))
        );
    }

    #[test]
    fn resume_with_future_date_keeps_it() {
        let today = date(2026, 5, 10);
        assert_eq!(
            resume_date(date(2026, 5, 11), today, Frequency::Quarterly),
            Ok(date(2026, 5, 11))
        );
    }

    #[test]
    fn reschedule_window() {
        let today = date(2026, 6, 1);
        assert!(validate_reschedule(today, today).is_err());
        assert!(validate_reschedule(date(2026, 5, 31), today).is_err());
        assert!(validate_reschedule(date(2026, 6, 2), today).is_ok());
        assert!(validate_reschedule(today + Duration::days(365), today).is_ok());
        assert!(validate_reschedule(today + Duration::days(366), today).is_err());
    }

    #[test]
    fn lifecycle_transitions() {
        assert!(validate_transition(SUBSCRIPTION_ACTIVE, SUBSCRIPTION_PAUSED).is_ok());
        assert!(validate_transition(SUBSCRIPTION_PAUSED, SUBSCRIPTION_ACTIVE).is_ok());
        assert!(validate_transition(SUBSCRIPTION_PAUSED, SUBSCRIPTION_CANCELLED).is_ok());
        assert!(validate_transition(SUBSCRIPTION_ACTIVE, SUBSCRIPTION_ACTIVE).is_err());
        assert!(validate_transition(SUBSCRIPTION_CANCELLED, SUBSCRIPTION_ACTIVE).is_err());
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
