//! Subscription model and DTOs.

use cgk_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub tenant_slug: String,
    pub customer_email: String,
    pub product_ref: String,
    pub quantity: i32,
    pub frequency: String,
    pub status: String,
    pub next_billing_date: NaiveDate,
    pub skipped_count: i32,
    pub paused_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub cancel_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscription {
    pub customer_email: String,
    pub product_ref: String,
    pub quantity: Option<i32>,
    pub frequency: String,
    /// First billing date; defaults to one interval from today.
    pub start_date: Option<NaiveDate>,
}

/// Insert DTO after the billing date has been computed.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub customer_email: String,
    pub product_ref: String,
    pub quantity: i32,
    pub frequency: String,
    pub next_billing_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleSubscription {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeFrequency {
    pub frequency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelSubscription {
    pub reason: Option<String>,
}
