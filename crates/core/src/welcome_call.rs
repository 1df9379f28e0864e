//! Welcome-call slot generation.
//!
//! A host publishes weekly availability windows. Candidate slots are laid
//! out on a fixed grid from each window's start, then dropped when they fall
//! inside the booking lead time or overlap an existing booking padded by a
//! buffer on both sides. All times are UTC.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::types::Timestamp;

pub const BOOKING_SCHEDULED: &str = "scheduled";
pub const BOOKING_CANCELLED: &str = "cancelled";
pub const BOOKING_COMPLETED: &str = "completed";

pub const BOOKING_STATUSES: &[&str] = &[BOOKING_SCHEDULED, BOOKING_CANCELLED, BOOKING_COMPLETED];

/// Length of a welcome call.
pub const SLOT_MINUTES: i64 = 30;
/// Padding kept free before and after every existing booking.
pub const BUFFER_MINUTES: i64 = 15;
/// Minimum notice between now and the start of a bookable slot.
pub const LEAD_MINUTES: i64 = 60;
/// Widest date range a single slot query may cover (inclusive).
pub const MAX_RANGE_DAYS: i64 = 31;

/// A recurring weekly window. `day_of_week` is 0 = Monday .. 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// An existing booking that blocks the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// A bookable candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Slot {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Tunables for [`generate_slots`]. `Default` uses the module constants.
#[derive(Debug, Clone, Copy)]
pub struct SlotRules {
    pub slot_minutes: i64,
    pub buffer_minutes: i64,
    pub lead_minutes: i64,
}

impl Default for SlotRules {
    fn default() -> Self {
        Self {
            slot_minutes: SLOT_MINUTES,
            buffer_minutes: BUFFER_MINUTES,
            lead_minutes: LEAD_MINUTES,
        }
    }
}

pub fn validate_window(day_of_week: i16, start: NaiveTime, end: NaiveTime) -> Result<(), String> {
    if !(0..=6).contains(&day_of_week) {
        return Err(format!(
            "day_of_week must be between 0 (Monday) and 6 (Sunday), got {day_of_week}"
        ));
    }
    if end <= start {
        return Err(format!("end_time {end} must be after start_time {start}"));
    }
    Ok(())
}

pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), String> {
    if to < from {
        return Err(format!("'to' ({to}) must not be before 'from' ({from})"));
    }
    if (to - from).num_days() >= MAX_RANGE_DAYS {
        return Err(format!("Date range may span at most {MAX_RANGE_DAYS} days"));
    }
    Ok(())
}

/// Whether `slot` collides with `booking` once the booking is padded by
/// `buffer` on both sides. Touching intervals do not collide.
fn overlaps(slot: &Slot, booking: &BookedInterval, buffer: Duration) -> bool {
    let blocked_start = booking.starts_at - buffer;
    let blocked_end = booking.ends_at + buffer;
    slot.starts_at < blocked_end && slot.ends_at > blocked_start
}

/// Generate every free slot in `[from, to]`, sorted and de-duplicated.
pub fn generate_slots(
    from: NaiveDate,
    to: NaiveDate,
    windows: &[AvailabilityWindow],
    bookings: &[BookedInterval],
    now: Timestamp,
    rules: SlotRules,
) -> Result<Vec<Slot>, String> {
    validate_range(from, to)?;

    let slot_len = Duration::minutes(rules.slot_minutes);
    let buffer = Duration::minutes(rules.buffer_minutes);
    let earliest = now + Duration::minutes(rules.lead_minutes);

    let mut slots = Vec::new();
    for date in from.iter_days().take_while(|d| *d <= to) {
        let weekday = date.weekday().num_days_from_monday() as i16;
        for window in windows.iter().filter(|w| w.day_of_week == weekday) {
            let window_end = date.and_time(window.end_time).and_utc();
            let mut cursor = date.and_time(window.start_time).and_utc();
            while cursor + slot_len <= window_end {
                let slot = Slot {
                    starts_at: cursor,
                    ends_at: cursor + slot_len,
                };
                let free = slot.starts_at >= earliest
                    && !bookings.iter().any(|b| overlaps(&slot, b, buffer));
                if free {
                    slots.push(slot);
                }
                cursor += slot_len;
            }
        }
    }

    slots.sort();
    slots.dedup();
    Ok(slots)
}

/// Whether a slot starting exactly at `starts_at` is currently bookable.
pub fn is_slot_available(
    starts_at: Timestamp,
    windows: &[AvailabilityWindow],
    bookings: &[BookedInterval],
    now: Timestamp,
    rules: SlotRules,
) -> bool {
    let date = starts_at.date_naive();
    generate_slots(date, date, windows, bookings, now, rules)
        .map(|slots| slots.iter().any(|s| s.starts_at == starts_at))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> Timestamp {
        // June 2026: the 1st is a Monday.
        Utc.with_ymd_and_hms(2026, 6, d, h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn monday_morning() -> AvailabilityWindow {
        AvailabilityWindow {
            day_of_week: 0,
            start_time: t(9, 0),
            end_time: t(11, 0),
        }
    }

    fn long_ago() -> Timestamp {
        at(1, 0, 0) - Duration::days(30)
    }

    #[test]
    fn fills_window_on_thirty_minute_grid() {
        let slots = generate_slots(
            date(1),
            date(1),
            &[monday_morning()],
            &[],
            long_ago(),
            SlotRules::default(),
        )
        .unwrap();
        let starts: Vec<Timestamp> = slots.iter().map(|s| s.starts_at).collect();
        assert_eq!(starts, vec![at(1, 9, 0), at(1, 9, 30), at(1, 10, 0), at(1, 10, 30)]);
        assert!(slots.iter().all(|s| s.ends_at - s.starts_at == Duration::minutes(30)));
    }

    #[test]
    fn partial_tail_is_dropped() {
        let window = AvailabilityWindow {
            day_of_week: 0,
            start_time: t(9, 0),
            end_time: t(10, 15),
        };
        let slots =
            generate_slots(date(1), date(1), &[window], &[], long_ago(), SlotRules::default())
                .unwrap();
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn only_matching_weekdays_produce_slots() {
        // Range covers Monday 1st through Sunday 7th; only Monday matches.
        let slots = generate_slots(
            date(1),
            date(7),
            &[monday_morning()],
            &[],
            long_ago(),
            SlotRules::default(),
        )
        .unwrap();
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.starts_at.date_naive() == date(1)));
    }

    #[test]
    fn booking_blocks_buffer_padded_neighbours() {
        // Booking 10:00-10:30, padded to 09:45-10:45: 09:30, 10:00 and 10:30 collide.
        let booking = BookedInterval {
            starts_at: at(1, 10, 0),
            ends_at: at(1, 10, 30),
        };
        let slots = generate_slots(
            date(1),
            date(1),
            &[monday_morning()],
            &[booking],
            long_ago(),
            SlotRules::default(),
        )
        .unwrap();
        let starts: Vec<Timestamp> = slots.iter().map(|s| s.starts_at).collect();
        assert_eq!(starts, vec![at(1, 9, 0)]);
    }

    #[test]
    fn touching_padded_booking_does_not_block() {
        // Booking 09:45-10:15 padded to 09:30-10:30; 09:00-09:30 only touches it.
        let booking = BookedInterval {
            starts_at: at(1, 9, 45),
            ends_at: at(1, 10, 15),
        };
        let slots = generate_slots(
            date(1),
            date(1),
            &[monday_morning()],
            &[booking],
            long_ago(),
            SlotRules::default(),
        )
        .unwrap();
        let starts: Vec<Timestamp> = slots.iter().map(|s| s.starts_at).collect();
        assert_eq!(starts, vec![at(1, 9, 0), at(1, 10, 30)]);
    }

    #[test]
    fn lead_time_hides_imminent_slots() {
        // Now is 08:30, so nothing before 09:30 is bookable.
        let slots = generate_slots(
            date(1),
            date(1),
            &[monday_morning()],
            &[],
            at(1, 8, 30),
            SlotRules::default(),
        )
        .unwrap();
        assert_eq!(slots.first().map(|s| s.starts_at), Some(at(1, 9, 30)));
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn overlapping_windows_are_deduplicated() {
        let second = AvailabilityWindow {
            day_of_week: 0,
            start_time: t(10, 0),
            end_time: t(12, 0),
        };
        let slots = generate_slots(
            date(1),
            date(1),
            &[monday_morning(), second],
            &[],
            long_ago(),
            SlotRules::default(),
        )
        .unwrap();
        // 09:00..11:00 and 10:00..12:00 union is 09:00..12:00 = 6 slots.
        assert_eq!(slots.len(), 6);
        assert!(slots.windows(2).all(|w| w[0].starts_at < w[1].starts_at));
    }

    #[test]
    fn range_validation() {
        assert!(validate_range(date(2), date(1)).is_err());
        assert!(validate_range(date(1), date(1)).is_ok());
        assert!(validate_range(date(1), date(1) + Duration::days(30)).is_ok());
        assert!(validate_range(date(1), date(1) + Duration::days(31)).is_err());
    }

    #[test]
    fn window_validation() {
        assert!(validate_window(0, t(9, 0), t(17, 0)).is_ok());
        assert!(validate_window(7, t(9, 0), t(17, 0)).is_err());
        assert!(validate_window(-1, t(9, 0), t(17, 0)).is_err());
        assert!(validate_window(3, t(9, 0), t(9, 0)).is_err());
    }

    #[test]
    fn availability_check_matches_grid() {
        let windows = [monday_morning()];
        let rules = SlotRules::default();
        assert!(is_slot_available(at(1, 9, 30), &windows, &[], long_ago(), rules));
        assert!(!is_slot_available(at(1, 9, 15), &windows, &[], long_ago(), rules));
        assert!(!is_slot_available(at(2, 9, 30), &windows, &[], long_ago(), rules));
    }
}
