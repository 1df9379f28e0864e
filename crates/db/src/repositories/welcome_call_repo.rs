//! Repositories for welcome-call availability windows and bookings.

use cgk_core::types::{DbId, Timestamp};
use cgk_core::welcome_call::{BOOKING_CANCELLED, BOOKING_COMPLETED, BOOKING_SCHEDULED};
use sqlx::{PgConnection, PgPool};

use crate::models::welcome_call::{Availability, Booking, BookingFilter, CreateAvailability, CreateBooking};
use crate::tenant;

const AVAILABILITY_COLUMNS: &str =
    "id, tenant_slug, host_user_id, day_of_week, start_time, end_time, created_at, updated_at";

const BOOKING_COLUMNS: &str = "id, tenant_slug, host_user_id, creator_id, attendee_name, \
                                attendee_email, starts_at, ends_at, status, notes, \
                                created_at, updated_at";

/// Weekly availability windows of welcome-call hosts.
pub struct AvailabilityRepo;

impl AvailabilityRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        input: &CreateAvailability,
    ) -> Result<Availability, sqlx::Error> {
        let query = format!(
            "INSERT INTO welcome_call_availability
                (tenant_slug, host_user_id, day_of_week, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {AVAILABILITY_COLUMNS}"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(tenant_slug)
            .bind(input.host_user_id)
            .bind(input.day_of_week)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(pool)
            .await
    }

    /// List windows, optionally for a single host, in weekly order.
    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        host_user_id: Option<DbId>,
    ) -> Result<Vec<Availability>, sqlx::Error> {
        let query = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM welcome_call_availability
             WHERE tenant_slug = $1 AND ($2::BIGINT IS NULL OR host_user_id = $2)
             ORDER BY host_user_id, day_of_week, start_time"
        );
        sqlx::query_as::<_, Availability>(&query)
            .bind(tenant_slug)
            .bind(host_user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a window. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, tenant_slug: &str, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM welcome_call_availability WHERE tenant_slug = $1 AND id = $2",
        )
        .bind(tenant_slug)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Welcome-call bookings.
pub struct BookingRepo;

impl BookingRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM welcome_call_bookings WHERE tenant_slug = $1 AND id = $2"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM welcome_call_bookings
             WHERE tenant_slug = $1
               AND ($2::BIGINT IS NULL OR host_user_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_slug)
            .bind(filter.host_user_id)
            .bind(&filter.status)
            .fetch_all(pool)
            .await
    }

    /// Scheduled bookings of a host that intersect `[from, to)`.
    pub async fn list_scheduled_between(
        pool: &PgPool,
        tenant_slug: &str,
        host_user_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        scheduled_between(&mut conn, tenant_slug, host_user_id, from, to).await
    }

    /// Insert a booking if `is_free` accepts the host's current schedule.
    ///
    /// The host is serialized with a transaction-level advisory lock so two
    /// overlapping requests cannot both pass the check. `is_free` receives
    /// the scheduled bookings intersecting `[window_from, window_to)`.
    /// Returns `None` when the slot is not free.
    pub async fn create_if_free<F>(
        pool: &PgPool,
        tenant_slug: &str,
        input: &CreateBooking,
        ends_at: Timestamp,
        window: (Timestamp, Timestamp),
        is_free: F,
    ) -> Result<Option<Booking>, sqlx::Error>
    where
        F: FnOnce(&[Booking]) -> bool,
    {
        let mut tx = tenant::begin(pool, tenant_slug).await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(input.host_user_id)
            .execute(&mut *tx)
            .await?;

        let existing =
            scheduled_between(&mut tx, tenant_slug, input.host_user_id, window.0, window.1).await?;
        if !is_free(&existing) {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO welcome_call_bookings
                (tenant_slug, host_user_id, creator_id, attendee_name, attendee_email,
                 starts_at, ends_at, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {BOOKING_COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_slug)
            .bind(input.host_user_id)
            .bind(input.creator_id)
            .bind(&input.attendee_name)
            .bind(&input.attendee_email)
            .bind(input.starts_at)
            .bind(ends_at)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(booking))
    }

    pub async fn cancel(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        Self::finish(pool, tenant_slug, id, BOOKING_CANCELLED).await
    }

    pub async fn complete(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        Self::finish(pool, tenant_slug, id, BOOKING_COMPLETED).await
    }

    async fn finish(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        to: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE welcome_call_bookings SET status = $3
             WHERE tenant_slug = $1 AND id = $2 AND status = $4
             RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(to)
            .bind(BOOKING_SCHEDULED)
            .fetch_optional(pool)
            .await
    }
}

async fn scheduled_between(
    conn: &mut PgConnection,
    tenant_slug: &str,
    host_user_id: DbId,
    from: Timestamp,
    to: Timestamp,
) -> Result<Vec<Booking>, sqlx::Error> {
    let query = format!(
        "SELECT {BOOKING_COLUMNS} FROM welcome_call_bookings
         WHERE tenant_slug = $1 AND host_user_id = $2 AND status = $3
           AND starts_at < $5 AND ends_at > $4
         ORDER BY starts_at ASC"
    );
    sqlx::query_as::<_, Booking>(&query)
        .bind(tenant_slug)
        .bind(host_user_id)
        .bind(BOOKING_SCHEDULED)
        .bind(from)
        .bind(to)
        .fetch_all(conn)
        .await
}
