//! Handlers for `/subscriptions`: creation, listing and the lifecycle
//! actions (skip, pause, resume, reschedule, frequency change, cancel).
//!
//! Date arithmetic lives in `cgk_core::subscription`; every change is one
//! conditional `UPDATE`, and a refused update is reported as 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cgk_core::creator::validate_email;
use cgk_core::state_machine::validate_status;
use cgk_core::subscription::{
    self, Frequency, SUBSCRIPTION_ACTIVE, SUBSCRIPTION_PAUSED, SUBSCRIPTION_STATUSES,
};
use cgk_core::types::DbId;
use cgk_db::models::subscription::{
    CancelSubscription, ChangeFrequency, CreateSubscription, NewSubscription,
    RescheduleSubscription, Subscription,
};
use cgk_db::repositories::SubscriptionRepo;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /subscriptions/due`.
#[derive(Debug, Deserialize)]
pub struct DueParams {
    /// Defaults to today (UTC).
    pub on: Option<NaiveDate>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn parse_frequency(value: &str) -> AppResult<Frequency> {
    Frequency::parse(value).map_err(AppError::validation)
}

fn stored_frequency(sub: &Subscription) -> AppResult<Frequency> {
    Frequency::parse(&sub.frequency).map_err(|e| {
        AppError::InternalError(format!("Subscription {} has a corrupt frequency: {e}", sub.id))
    })
}

async fn load(state: &AppState, tenant: &str, id: DbId) -> AppResult<Subscription> {
    SubscriptionRepo::find_by_id(&state.pool, tenant, id)
        .await?
        .ok_or(AppError::not_found("Subscription", id))
}

/// Build the 409 for an action that requires one of `allowed`.
fn wrong_status(current: &Subscription, action: &str, allowed: &[&str]) -> AppError {
    AppError::conflict(format!(
        "Cannot {action} a subscription in status '{}' (requires {})",
        current.status,
        allowed.join(" or ")
    ))
}

/// After a refused conditional update: 404 if gone, 409 otherwise.
async fn refused(
    state: &AppState,
    tenant: &str,
    id: DbId,
    action: &str,
    allowed: &[&str],
) -> AppError {
    match load(state, tenant, id).await {
        Ok(current) if allowed.contains(&current.status.as_str()) => AppError::conflict(format!(
            "Subscription {id} was modified concurrently; retry the {action}"
        )),
        Ok(current) => wrong_status(&current, action, allowed),
        Err(e) => e,
    }
}

/// POST /api/v1/subscriptions
pub async fn create(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSubscription>,
) -> AppResult<(StatusCode, Json<DataResponse<Subscription>>)> {
    validate_email(&input.customer_email).map_err(AppError::validation)?;
    if input.product_ref.trim().is_empty() {
        return Err(AppError::validation("product_ref must not be empty"));
    }
    let quantity = input.quantity.unwrap_or(1);
    subscription::validate_quantity(quantity).map_err(AppError::validation)?;
    let frequency = parse_frequency(&input.frequency)?;
    let next_billing_date =
        subscription::initial_billing_date(input.start_date, today(), frequency)
            .map_err(AppError::validation)?;

    let sub = SubscriptionRepo::create(
        &state.pool,
        ctx.slug(),
        &NewSubscription {
            customer_email: input.customer_email.trim().to_string(),
            product_ref: input.product_ref.trim().to_string(),
            quantity,
            frequency: frequency.as_str().to_string(),
            next_billing_date,
        },
    )
    .await?;
    tracing::info!(tenant = %ctx.slug, subscription_id = sub.id, %frequency, %next_billing_date, "Subscription created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(sub))))
}

/// GET /api/v1/subscriptions?status=
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Subscription>>>> {
    if let Some(status) = params.status.as_deref() {
        validate_status("subscription", SUBSCRIPTION_STATUSES, status)
            .map_err(AppError::validation)?;
    }
    let (limit, offset) = params.page();
    let subs =
        SubscriptionRepo::list(&state.pool, ctx.slug(), params.status.as_deref(), limit, offset)
            .await?;
    Ok(Json(DataResponse::new(subs)))
}

/// GET /api/v1/subscriptions/due?on=YYYY-MM-DD
pub async fn due(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<DueParams>,
) -> AppResult<Json<DataResponse<Vec<Subscription>>>> {
    let on = params.on.unwrap_or_else(today);
    let subs = SubscriptionRepo::list_due(&state.pool, ctx.slug(), on).await?;
    Ok(Json(DataResponse::new(subs)))
}

/// GET /api/v1/subscriptions/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let sub = load(&state, ctx.slug(), id).await?;
    Ok(Json(DataResponse::new(sub)))
}

/// POST /api/v1/subscriptions/{id}/skip
pub async fn skip(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = load(&state, ctx.slug(), id).await?;
    if current.status != SUBSCRIPTION_ACTIVE {
        return Err(wrong_status(&current, "skip", &[SUBSCRIPTION_ACTIVE]));
    }
    let next = subscription::skip_date(current.next_billing_date, stored_frequency(&current)?)
        .map_err(AppError::validation)?;

    match SubscriptionRepo::skip(&state.pool, ctx.slug(), id, current.next_billing_date, next)
        .await?
    {
        Some(sub) => {
            tracing::info!(tenant = %ctx.slug, subscription_id = id, next_billing_date = %next, "Subscription skipped");
            Ok(Json(DataResponse::new(sub)))
        }
        None => Err(refused(&state, ctx.slug(), id, "skip", &[SUBSCRIPTION_ACTIVE]).await),
    }
}

/// POST /api/v1/subscriptions/{id}/pause
pub async fn pause(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    match SubscriptionRepo::pause(&state.pool, ctx.slug(), id).await? {
        Some(sub) => {
            tracing::info!(tenant = %ctx.slug, subscription_id = id, "Subscription paused");
            Ok(Json(DataResponse::new(sub)))
        }
        None => Err(refused(&state, ctx.slug(), id, "pause", &[SUBSCRIPTION_ACTIVE]).await),
    }
}

/// POST /api/v1/subscriptions/{id}/resume
pub async fn resume(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = load(&state, ctx.slug(), id).await?;
    if current.status != SUBSCRIPTION_PAUSED {
        return Err(wrong_status(&current, "resume", &[SUBSCRIPTION_PAUSED]));
    }
    let next = subscription::resume_date(
        current.next_billing_date,
        today(),
        stored_frequency(&current)?,
    )
    .map_err(AppError::validation)?;

    match SubscriptionRepo::resume(&state.pool, ctx.slug(), id, current.next_billing_date, next)
        .await?
    {
        Some(sub) => {
            tracing::info!(tenant = %ctx.slug, subscription_id = id, next_billing_date = %next, "Subscription resumed");
            Ok(Json(DataResponse::new(sub)))
        }
        None => Err(refused(&state, ctx.slug(), id, "resume", &[SUBSCRIPTION_PAUSED]).await),
    }
}

/// POST /api/v1/subscriptions/{id}/reschedule
pub async fn reschedule(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RescheduleSubscription>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    subscription::validate_reschedule(input.date, today()).map_err(AppError::validation)?;

    match SubscriptionRepo::reschedule(&state.pool, ctx.slug(), id, input.date).await? {
        Some(sub) => {
            tracing::info!(tenant = %ctx.slug, subscription_id = id, next_billing_date = %input.date, "Subscription rescheduled");
            Ok(Json(DataResponse::new(sub)))
        }
        None => Err(refused(
            &state,
            ctx.slug(),
            id,
            "reschedule",
            subscription::SCHEDULABLE_STATUSES,
        )
        .await),
    }
}

/// PUT /api/v1/subscriptions/{id}/frequency
///
/// The next billing date is kept; the new interval applies from then on.
pub async fn change_frequency(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeFrequency>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let frequency = parse_frequency(&input.frequency)?;

    match SubscriptionRepo::change_frequency(&state.pool, ctx.slug(), id, frequency.as_str())
        .await?
    {
        Some(sub) => {
            tracing::info!(tenant = %ctx.slug, subscription_id = id, %frequency, "Subscription frequency changed");
            Ok(Json(DataResponse::new(sub)))
        }
        None => Err(refused(
            &state,
            ctx.slug(),
            id,
            "change the frequency of",
            subscription::SCHEDULABLE_STATUSES,
        )
        .await),
    }
}

/// POST /api/v1/subscriptions/{id}/cancel
pub async fn cancel(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CancelSubscription>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let reason = input.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());

    match SubscriptionRepo::cancel(&state.pool, ctx.slug(), id, reason).await? {
        Some(sub) => {
            tracing::info!(tenant = %ctx.slug, subscription_id = id, "Subscription cancelled");
            Ok(Json(DataResponse::new(sub)))
        }
        None => Err(refused(
            &state,
            ctx.slug(),
            id,
            "cancel",
            subscription::SCHEDULABLE_STATUSES,
        )
        .await),
    }
}
