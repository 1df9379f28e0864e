//! Welcome-call availability windows and bookings.

use cgk_core::types::{DbId, Timestamp};
use cgk_core::welcome_call::{AvailabilityWindow, BookedInterval};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `welcome_call_availability` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Availability {
    pub id: DbId,
    pub tenant_slug: String,
    pub host_user_id: DbId,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Availability> for AvailabilityWindow {
    fn from(row: &Availability) -> Self {
        Self {
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailability {
    pub host_user_id: DbId,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A row from the `welcome_call_bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub tenant_slug: String,
    pub host_user_id: DbId,
    pub creator_id: Option<DbId>,
    pub attendee_name: String,
    pub attendee_email: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Booking> for BookedInterval {
    fn from(row: &Booking) -> Self {
        Self {
            starts_at: row.starts_at,
            ends_at: row.ends_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub host_user_id: DbId,
    pub creator_id: Option<DbId>,
    pub attendee_name: String,
    pub attendee_email: String,
    pub starts_at: Timestamp,
    pub notes: Option<String>,
}

/// Query parameters for `GET /welcome-calls/slots`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub host_user_id: DbId,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub host_user_id: Option<DbId>,
    pub status: Option<String>,
}
