//! Handlers for the `/creators` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cgk_core::creator::{validate_commission_percent, validate_email, CREATOR_STATUSES};
use cgk_core::roles::is_tenant_admin;
use cgk_core::state_machine::validate_status;
use cgk_core::types::DbId;
use cgk_db::models::creator::{CreateCreator, Creator, UpdateCreator};
use cgk_db::repositories::{CreatorRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Admins may act for any creator; anyone else only for the creator
/// record linked to their own user.
pub(crate) async fn ensure_owner_or_admin(
    state: &AppState,
    ctx: &TenantContext,
    creator_id: DbId,
) -> AppResult<()> {
    if is_tenant_admin(&ctx.user.role) {
        return Ok(());
    }
    let creator = CreatorRepo::find_by_id(&state.pool, ctx.slug(), creator_id)
        .await?
        .ok_or(AppError::not_found("Creator", creator_id))?;
    if creator.user_id != Some(ctx.user.user_id) {
        return Err(AppError::forbidden("Not linked to this creator"));
    }
    Ok(())
}

fn validate_fields(
    name: Option<&str>,
    email: Option<&str>,
    status: Option<&str>,
    commission_percent: Option<i32>,
) -> AppResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Creator name must not be empty"));
    }
    if let Some(email) = email {
        validate_email(email).map_err(AppError::validation)?;
    }
    if let Some(status) = status {
        validate_status("creator", CREATOR_STATUSES, status).map_err(AppError::validation)?;
    }
    if let Some(percent) = commission_percent {
        validate_commission_percent(percent).map_err(AppError::validation)?;
    }
    Ok(())
}

/// POST /api/v1/creators
pub async fn create(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCreator>,
) -> AppResult<(StatusCode, Json<DataResponse<Creator>>)> {
    validate_fields(
        Some(&input.name),
        Some(&input.email),
        input.status.as_deref(),
        input.commission_percent,
    )?;
    if let Some(user_id) = input.user_id {
        UserRepo::find_in_tenant(&state.pool, ctx.slug(), user_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("User {user_id} does not exist")))?;
    }

    let creator = CreatorRepo::create(&state.pool, ctx.slug(), &input).await?;
    tracing::info!(tenant = %ctx.slug, creator_id = creator.id, "Creator created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(creator))))
}

/// GET /api/v1/creators?status=
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Creator>>>> {
    if let Some(status) = params.status.as_deref() {
        validate_status("creator", CREATOR_STATUSES, status).map_err(AppError::validation)?;
    }
    let (limit, offset) = params.page();
    let creators =
        CreatorRepo::list(&state.pool, ctx.slug(), params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse::new(creators)))
}

/// GET /api/v1/creators/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Creator>>> {
    let creator = CreatorRepo::find_by_id(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("Creator", id))?;
    Ok(Json(DataResponse::new(creator)))
}

/// PUT /api/v1/creators/{id}
pub async fn update(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCreator>,
) -> AppResult<Json<DataResponse<Creator>>> {
    validate_fields(
        input.name.as_deref(),
        input.email.as_deref(),
        input.status.as_deref(),
        input.commission_percent,
    )?;

    let creator = CreatorRepo::update(&state.pool, ctx.slug(), id, &input)
        .await?
        .ok_or(AppError::not_found("Creator", id))?;
    Ok(Json(DataResponse::new(creator)))
}

/// DELETE /api/v1/creators/{id}
pub async fn delete(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CreatorRepo::soft_delete(&state.pool, ctx.slug(), id).await? {
        tracing::info!(tenant = %ctx.slug, creator_id = id, "Creator deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Creator", id))
    }
}
