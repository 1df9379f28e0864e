//! Handlers for `/welcome-calls`: host availability, open slots and
//! bookings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use cgk_core::creator::validate_email;
use cgk_core::state_machine::validate_status;
use cgk_core::types::{DbId, Timestamp};
use cgk_core::welcome_call::{
    self, AvailabilityWindow, BookedInterval, Slot, SlotRules, BOOKING_CANCELLED,
    BOOKING_COMPLETED, BOOKING_STATUSES, BOOKING_SCHEDULED,
};
use cgk_db::models::welcome_call::{
    Availability, Booking, BookingFilter, CreateAvailability, CreateBooking, SlotQuery,
};
use cgk_db::repositories::{AvailabilityRepo, BookingRepo, CreatorRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityParams {
    pub host_user_id: Option<DbId>,
}

async fn ensure_host(state: &AppState, ctx: &TenantContext, host_user_id: DbId) -> AppResult<()> {
    UserRepo::find_in_tenant(&state.pool, ctx.slug(), host_user_id)
        .await?
        .ok_or(AppError::not_found("User", host_user_id))?;
    Ok(())
}

async fn windows_for(
    state: &AppState,
    ctx: &TenantContext,
    host_user_id: DbId,
) -> AppResult<Vec<AvailabilityWindow>> {
    let rows = AvailabilityRepo::list(&state.pool, ctx.slug(), Some(host_user_id)).await?;
    Ok(rows.iter().map(AvailabilityWindow::from).collect())
}

/// Bounds of the bookings that can block a slot in `[from, to]`.
fn blocking_window(from: NaiveDate, to: NaiveDate, rules: SlotRules) -> (Timestamp, Timestamp) {
    let buffer = Duration::minutes(rules.buffer_minutes);
    let start = from.and_time(NaiveTime::MIN).and_utc() - buffer;
    let end = (to + Duration::days(1)).and_time(NaiveTime::MIN).and_utc() + buffer;
    (start, end)
}

/// GET /api/v1/welcome-calls/availability?host_user_id=
pub async fn list_availability(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<DataResponse<Vec<Availability>>>> {
    let rows = AvailabilityRepo::list(&state.pool, ctx.slug(), params.host_user_id).await?;
    Ok(Json(DataResponse::new(rows)))
}

/// POST /api/v1/welcome-calls/availability
pub async fn create_availability(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAvailability>,
) -> AppResult<(StatusCode, Json<DataResponse<Availability>>)> {
    welcome_call::validate_window(input.day_of_week, input.start_time, input.end_time)
        .map_err(AppError::validation)?;
    ensure_host(&state, &ctx, input.host_user_id).await?;
    let row = AvailabilityRepo::create(&state.pool, ctx.slug(), &input).await?;
    tracing::info!(
        tenant = %ctx.slug,
        host_user_id = row.host_user_id,
        day_of_week = row.day_of_week,
        "Availability window added"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(row))))
}

/// DELETE /api/v1/welcome-calls/availability/{id}
pub async fn delete_availability(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AvailabilityRepo::delete(&state.pool, ctx.slug(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Availability", id))
    }
}

/// GET /api/v1/welcome-calls/slots?host_user_id=&from=&to=
pub async fn slots(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    welcome_call::validate_range(query.from, query.to).map_err(AppError::validation)?;
    let rules = SlotRules::default();
    let windows = windows_for(&state, &ctx, query.host_user_id).await?;
    let (start, end) = blocking_window(query.from, query.to, rules);
    let booked: Vec<BookedInterval> =
        BookingRepo::list_scheduled_between(&state.pool, ctx.slug(), query.host_user_id, start, end)
            .await?
            .iter()
            .map(BookedInterval::from)
            .collect();
    let slots = welcome_call::generate_slots(
        query.from,
        query.to,
        &windows,
        &booked,
        Utc::now(),
        rules,
    )
    .map_err(AppError::validation)?;
    Ok(Json(DataResponse::new(slots)))
}

/// GET /api/v1/welcome-calls/bookings?host_user_id=&status=
pub async fn list_bookings(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    if let Some(status) = filter.status.as_deref() {
        validate_status("booking", BOOKING_STATUSES, status).map_err(AppError::validation)?;
    }
    let bookings = BookingRepo::list(&state.pool, ctx.slug(), &filter).await?;
    Ok(Json(DataResponse::new(bookings)))
}

/// GET /api/v1/welcome-calls/bookings/{id}
pub async fn get_booking(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::find_by_id(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("Booking", id))?;
    Ok(Json(DataResponse::new(booking)))
}

/// POST /api/v1/welcome-calls/bookings
///
/// The start must be one of the slots `GET /slots` would offer right now.
pub async fn create_booking(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    if input.attendee_name.trim().is_empty() {
        return Err(AppError::validation("attendee_name must not be empty"));
    }
    validate_email(&input.attendee_email).map_err(AppError::validation)?;
    ensure_host(&state, &ctx, input.host_user_id).await?;
    if let Some(creator_id) = input.creator_id {
        CreatorRepo::find_by_id(&state.pool, ctx.slug(), creator_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Creator {creator_id} does not exist")))?;
    }

    let rules = SlotRules::default();
    let windows = windows_for(&state, &ctx, input.host_user_id).await?;
    let day = input.starts_at.date_naive();
    let ends_at = input.starts_at + Duration::minutes(rules.slot_minutes);
    let now = Utc::now();

    let booking = BookingRepo::create_if_free(
        &state.pool,
        ctx.slug(),
        &input,
        ends_at,
        blocking_window(day, day, rules),
        |existing| {
            let booked: Vec<BookedInterval> = existing.iter().map(BookedInterval::from).collect();
            welcome_call::is_slot_available(input.starts_at, &windows, &booked, now, rules)
        },
    )
    .await?
    .ok_or_else(|| AppError::conflict(format!("Slot at {} is not available", input.starts_at)))?;

    tracing::info!(
        tenant = %ctx.slug,
        booking_id = booking.id,
        host_user_id = booking.host_user_id,
        starts_at = %booking.starts_at,
        "Welcome call booked"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(booking))))
}

async fn finish(
    state: &AppState,
    ctx: &TenantContext,
    id: DbId,
    to: &str,
) -> AppResult<Json<DataResponse<Booking>>> {
    let updated = if to == BOOKING_CANCELLED {
        BookingRepo::cancel(&state.pool, ctx.slug(), id).await?
    } else {
        BookingRepo::complete(&state.pool, ctx.slug(), id).await?
    };
    match updated {
        Some(booking) => {
            tracing::info!(tenant = %ctx.slug, booking_id = id, status = %to, "Booking closed");
            Ok(Json(DataResponse::new(booking)))
        }
        None => {
            let current = BookingRepo::find_by_id(&state.pool, ctx.slug(), id)
                .await?
                .ok_or(AppError::not_found("Booking", id))?;
            Err(AppError::conflict(format!(
                "Booking is {} and cannot become {to}; only {BOOKING_SCHEDULED} bookings can",
                current.status
            )))
        }
    }
}

/// POST /api/v1/welcome-calls/bookings/{id}/cancel
pub async fn cancel_booking(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    finish(&state, &ctx, id, BOOKING_CANCELLED).await
}

/// POST /api/v1/welcome-calls/bookings/{id}/complete
pub async fn complete_booking(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    finish(&state, &ctx, id, BOOKING_COMPLETED).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blocking_window_pads_whole_days_by_buffer() {
        let day = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let (start, end) = blocking_window(day, day, SlotRules::default());
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 5, 31, 23, 45, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 6, 2, 0, 15, 0).unwrap());
    }
}
