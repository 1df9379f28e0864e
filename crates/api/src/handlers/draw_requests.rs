//! Handlers for contractor `/draw-requests`.
//!
//! Contractors create and cancel their own requests and only ever see
//! their own. Admins review, pay out and may draw on a contractor's behalf.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cgk_core::draw_request::{
    self, DRAW_APPROVED, DRAW_CANCELLED, DRAW_PAID, DRAW_REJECTED, DRAW_STATUSES,
};
use cgk_core::roles::{is_tenant_admin, ROLE_CONTRACTOR};
use cgk_core::state_machine::validate_status;
use cgk_core::types::DbId;
use cgk_db::models::draw_request::{CreateDrawRequest, DrawRequest, ReviewDrawRequest};
use cgk_db::repositories::{DrawRequestRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Contractor whose requests the caller may see: `Some(own id)` for
/// contractors, `None` (all) for admins.
fn visibility(ctx: &TenantContext) -> AppResult<Option<DbId>> {
    if is_tenant_admin(&ctx.user.role) {
        Ok(None)
    } else if ctx.user.role == ROLE_CONTRACTOR {
        Ok(Some(ctx.user.user_id))
    } else {
        Err(AppError::forbidden("Contractor or admin role required"))
    }
}

/// Load a request the caller may see. Other contractors' requests are
/// reported as missing.
async fn load_visible(state: &AppState, ctx: &TenantContext, id: DbId) -> AppResult<DrawRequest> {
    let only = visibility(ctx)?;
    DrawRequestRepo::find_by_id(&state.pool, ctx.slug(), id)
        .await?
        .filter(|r| only.map_or(true, |uid| r.contractor_id == uid))
        .ok_or(AppError::not_found("DrawRequest", id))
}

/// Explain why a conditional update matched nothing.
async fn refused(
    state: &AppState,
    ctx: &TenantContext,
    id: DbId,
    to: &str,
) -> AppError {
    match load_visible(state, ctx, id).await {
        Ok(current) => AppError::conflict(
            draw_request::validate_transition(&current.status, to)
                .err()
                .unwrap_or_else(|| "Draw request was modified concurrently".to_string()),
        ),
        Err(e) => e,
    }
}

/// POST /api/v1/draw-requests
pub async fn create(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CreateDrawRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DrawRequest>>)> {
    draw_request::validate_amount(input.amount_cents).map_err(AppError::validation)?;

    let contractor_id = match visibility(&ctx)? {
        Some(own) => own,
        None => {
            let contractor_id = input.contractor_id.ok_or_else(|| {
                AppError::validation("contractor_id is required when drawing on behalf of a contractor")
            })?;
            let contractor = UserRepo::find_in_tenant(&state.pool, ctx.slug(), contractor_id)
                .await?
                .filter(|u| u.role == ROLE_CONTRACTOR)
                .ok_or_else(|| {
                    AppError::validation(format!("User {contractor_id} is not a contractor"))
                })?;
            contractor.id
        }
    };

    let request = DrawRequestRepo::create(
        &state.pool,
        ctx.slug(),
        contractor_id,
        input.amount_cents,
        input.description.as_deref(),
    )
    .await?;
    tracing::info!(
        tenant = %ctx.slug,
        draw_request_id = request.id,
        contractor_id,
        amount_cents = request.amount_cents,
        "Draw request created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(request))))
}

/// GET /api/v1/draw-requests?status=
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<DrawRequest>>>> {
    let only = visibility(&ctx)?;
    if let Some(status) = params.status.as_deref() {
        validate_status("draw request", DRAW_STATUSES, status).map_err(AppError::validation)?;
    }
    let (limit, offset) = params.page();
    let requests = DrawRequestRepo::list(
        &state.pool,
        ctx.slug(),
        only,
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse::new(requests)))
}

/// GET /api/v1/draw-requests/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DrawRequest>>> {
    let request = load_visible(&state, &ctx, id).await?;
    Ok(Json(DataResponse::new(request)))
}

/// POST /api/v1/draw-requests/{id}/approve
pub async fn approve(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DrawRequest>>> {
    match DrawRequestRepo::review(
        &state.pool,
        ctx.slug(),
        id,
        DRAW_APPROVED,
        ctx.user.user_id,
        None,
    )
    .await?
    {
        Some(request) => {
            tracing::info!(tenant = %ctx.slug, draw_request_id = id, reviewer = ctx.user.user_id, "Draw request approved");
            Ok(Json(DataResponse::new(request)))
        }
        None => Err(refused(&state, &ctx, id, DRAW_APPROVED).await),
    }
}

/// POST /api/v1/draw-requests/{id}/reject
pub async fn reject(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewDrawRequest>,
) -> AppResult<Json<DataResponse<DrawRequest>>> {
    let note = input
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("A note is required when rejecting"))?;

    match DrawRequestRepo::review(
        &state.pool,
        ctx.slug(),
        id,
        DRAW_REJECTED,
        ctx.user.user_id,
        Some(note),
    )
    .await?
    {
        Some(request) => {
            tracing::info!(tenant = %ctx.slug, draw_request_id = id, reviewer = ctx.user.user_id, "Draw request rejected");
            Ok(Json(DataResponse::new(request)))
        }
        None => Err(refused(&state, &ctx, id, DRAW_REJECTED).await),
    }
}

/// POST /api/v1/draw-requests/{id}/mark-paid
pub async fn mark_paid(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DrawRequest>>> {
    match DrawRequestRepo::mark_paid(&state.pool, ctx.slug(), id).await? {
        Some(request) => {
            tracing::info!(tenant = %ctx.slug, draw_request_id = id, "Draw request paid");
            Ok(Json(DataResponse::new(request)))
        }
        None => Err(refused(&state, &ctx, id, DRAW_PAID).await),
    }
}

/// POST /api/v1/draw-requests/{id}/cancel
pub async fn cancel(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DrawRequest>>> {
    // Ownership check first: a contractor cannot cancel someone else's request.
    load_visible(&state, &ctx, id).await?;
    match DrawRequestRepo::cancel(&state.pool, ctx.slug(), id).await? {
        Some(request) => Ok(Json(DataResponse::new(request))),
        None => Err(refused(&state, &ctx, id, DRAW_CANCELLED).await),
    }
}
