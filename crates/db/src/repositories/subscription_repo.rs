//! Repository for the `subscriptions` table.
//!
//! Every lifecycle change is a single conditional `UPDATE` guarded by the
//! allowed source statuses. A `None` result means the row is missing or no
//! longer in a state that permits the change.

use cgk_core::subscription::{
    SCHEDULABLE_STATUSES, SUBSCRIPTION_ACTIVE, SUBSCRIPTION_CANCELLED, SUBSCRIPTION_PAUSED,
};
use cgk_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::subscription::{NewSubscription, Subscription};

const COLUMNS: &str = "id, tenant_slug, customer_email, product_ref, quantity, frequency, status, \
                        next_billing_date, skipped_count, paused_at, cancelled_at, cancel_reason, \
                        created_at, updated_at";

pub struct SubscriptionRepo;

impl SubscriptionRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        input: &NewSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions
                (tenant_slug, customer_email, product_ref, quantity, frequency, next_billing_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(&input.customer_email)
            .bind(&input.product_ref)
            .bind(input.quantity)
            .bind(&input.frequency)
            .bind(input.next_billing_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM subscriptions WHERE tenant_slug = $1 AND id = $2");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions
             WHERE tenant_slug = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Active subscriptions whose next billing date is on or before `on`,
    /// earliest first.
    pub async fn list_due(
        pool: &PgPool,
        tenant_slug: &str,
        on: NaiveDate,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions
             WHERE tenant_slug = $1 AND status = $2 AND next_billing_date <= $3
             ORDER BY next_billing_date ASC, id ASC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(SUBSCRIPTION_ACTIVE)
            .bind(on)
            .fetch_all(pool)
            .await
    }

    /// Skip the upcoming order of an active subscription.
    ///
    /// `expected_date` is the billing date the new date was computed from;
    /// a concurrent change to it makes this a no-op.
    pub async fn skip(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        expected_date: NaiveDate,
        next_date: NaiveDate,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET
                next_billing_date = $4, skipped_count = skipped_count + 1
             WHERE tenant_slug = $1 AND id = $2 AND status = $3 AND next_billing_date = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(SUBSCRIPTION_ACTIVE)
            .bind(next_date)
            .bind(expected_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn pause(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET status = $3, paused_at = NOW()
             WHERE tenant_slug = $1 AND id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(SUBSCRIPTION_PAUSED)
            .bind(SUBSCRIPTION_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Resume a paused subscription with the given billing date.
    ///
    /// Guarded on `expected_date` the same way as [`Self::skip`].
    pub async fn resume(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        expected_date: NaiveDate,
        next_date: NaiveDate,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET status = $3, paused_at = NULL, next_billing_date = $5
             WHERE tenant_slug = $1 AND id = $2 AND status = $4 AND next_billing_date = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(SUBSCRIPTION_ACTIVE)
            .bind(SUBSCRIPTION_PAUSED)
            .bind(next_date)
            .bind(expected_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn reschedule(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        date: NaiveDate,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET next_billing_date = $3
             WHERE tenant_slug = $1 AND id = $2 AND status = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(date)
            .bind(SCHEDULABLE_STATUSES)
            .fetch_optional(pool)
            .await
    }

    /// Change the delivery frequency. The next billing date is kept.
    pub async fn change_frequency(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        frequency: &str,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET frequency = $3
             WHERE tenant_slug = $1 AND id = $2 AND status = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(frequency)
            .bind(SCHEDULABLE_STATUSES)
            .fetch_optional(pool)
            .await
    }

    pub async fn cancel(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET status = $3, cancelled_at = NOW(), cancel_reason = $5
             WHERE tenant_slug = $1 AND id = $2 AND status = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(SUBSCRIPTION_CANCELLED)
            .bind(SCHEDULABLE_STATUSES)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }
}
