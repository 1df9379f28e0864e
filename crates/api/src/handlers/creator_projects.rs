//! Handlers for the `/creator-projects` resource and its status workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cgk_core::creator_project::{
    self, PROJECT_APPROVED, PROJECT_CANCELLED, PROJECT_COMPLETED, PROJECT_REVISION_REQUESTED,
    PROJECT_STATUSES, PROJECT_SUBMITTED,
};
use cgk_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use cgk_core::state_machine::validate_status;
use cgk_core::types::DbId;
use cgk_db::models::creator_project::{
    CreateCreatorProject, CreatorProject, CreatorProjectFilter, UpdateCreatorProject,
};
use cgk_db::repositories::{CreatorProjectRepo, CreatorRepo};
use serde::Deserialize;

use super::creators::ensure_owner_or_admin;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /creator-projects/{id}/request-revision`.
#[derive(Debug, Deserialize)]
pub struct RevisionRequest {
    pub note: String,
}

async fn load(state: &AppState, ctx: &TenantContext, id: DbId) -> AppResult<CreatorProject> {
    CreatorProjectRepo::find_by_id(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("CreatorProject", id))
}

/// Apply a status change, turning a refused conditional update into 404 or 409.
async fn transition(
    state: &AppState,
    ctx: &TenantContext,
    id: DbId,
    to: &str,
    note: Option<&str>,
) -> AppResult<CreatorProject> {
    let sources = creator_project::sources_of(to);
    if let Some(project) =
        CreatorProjectRepo::transition(&state.pool, ctx.slug(), id, &sources, to, note).await?
    {
        tracing::info!(tenant = %ctx.slug, project_id = id, status = to, "Creator project status changed");
        return Ok(project);
    }

    let current = load(state, ctx, id).await?;
    let msg = creator_project::validate_transition(&current.status, to)
        .err()
        .unwrap_or_else(|| "Creator project was modified concurrently".to_string());
    Err(AppError::conflict(msg))
}

/// POST /api/v1/creator-projects
pub async fn create(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CreateCreatorProject>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatorProject>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    if let Some(budget) = input.budget_cents {
        creator_project::validate_budget(budget).map_err(AppError::validation)?;
    }
    ensure_owner_or_admin(&state, &ctx, input.creator_id).await?;
    CreatorRepo::find_by_id(&state.pool, ctx.slug(), input.creator_id)
        .await?
        .ok_or_else(|| {
            AppError::validation(format!("Creator {} does not exist", input.creator_id))
        })?;

    let project = CreatorProjectRepo::create(&state.pool, ctx.slug(), &input).await?;
    tracing::info!(tenant = %ctx.slug, project_id = project.id, creator_id = project.creator_id, "Creator project created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/creator-projects?creator_id=&status=
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<CreatorProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<CreatorProject>>>> {
    if let Some(status) = filter.status.as_deref() {
        validate_status("creator project", PROJECT_STATUSES, status)
            .map_err(AppError::validation)?;
    }
    let limit = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(filter.offset);
    let projects =
        CreatorProjectRepo::list(&state.pool, ctx.slug(), &filter, limit, offset).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/v1/creator-projects/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    let project = load(&state, &ctx, id).await?;
    Ok(Json(DataResponse::new(project)))
}

/// PUT /api/v1/creator-projects/{id}
///
/// Only `draft` and `revision_requested` projects are editable.
pub async fn update(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCreatorProject>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::validation("title must not be empty"));
    }
    if let Some(budget) = input.budget_cents {
        creator_project::validate_budget(budget).map_err(AppError::validation)?;
    }

    let current = load(&state, &ctx, id).await?;
    ensure_owner_or_admin(&state, &ctx, current.creator_id).await?;

    match CreatorProjectRepo::update(&state.pool, ctx.slug(), id, &input).await? {
        Some(project) => Ok(Json(DataResponse::new(project))),
        None => Err(AppError::conflict(format!(
            "Creator project in status '{}' cannot be edited",
            load(&state, &ctx, id).await?.status
        ))),
    }
}

/// POST /api/v1/creator-projects/{id}/submit
pub async fn submit(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    let current = load(&state, &ctx, id).await?;
    ensure_owner_or_admin(&state, &ctx, current.creator_id).await?;
    let project = transition(&state, &ctx, id, PROJECT_SUBMITTED, None).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/creator-projects/{id}/approve
pub async fn approve(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    let project = transition(&state, &ctx, id, PROJECT_APPROVED, None).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/creator-projects/{id}/request-revision
pub async fn request_revision(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RevisionRequest>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    let note = input.note.trim();
    if note.is_empty() {
        return Err(AppError::validation("A revision note is required"));
    }
    let project =
        transition(&state, &ctx, id, PROJECT_REVISION_REQUESTED, Some(note)).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/creator-projects/{id}/complete
pub async fn complete(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    let project = transition(&state, &ctx, id, PROJECT_COMPLETED, None).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/creator-projects/{id}/cancel
pub async fn cancel(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CreatorProject>>> {
    let project = transition(&state, &ctx, id, PROJECT_CANCELLED, None).await?;
    Ok(Json(DataResponse::new(project)))
}
