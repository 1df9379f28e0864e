//! Handlers for creator `/tax-forms`.
//!
//! Raw TINs never reach the database: the handler validates and masks them
//! with `cgk_core::tax_form::mask_tin` and stores only the last four
//! characters and a SHA-256 hash.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use cgk_core::roles::is_tenant_admin;
use cgk_core::state_machine::validate_status;
use cgk_core::tax_form::{
    self, TAX_FORM_APPROVED, TAX_FORM_REJECTED, TAX_FORM_STATUSES, TAX_FORM_SUBMITTED,
};
use cgk_core::types::DbId;
use cgk_db::models::tax_form::{NewTaxForm, RejectTaxForm, ResubmitTaxForm, SubmitTaxForm, TaxForm};
use cgk_db::repositories::{CreatorRepo, TaxFormRepo};
use serde::Deserialize;

use super::creators::ensure_owner_or_admin;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /tax-forms`.
#[derive(Debug, Default, Deserialize)]
pub struct TaxFormFilter {
    pub creator_id: Option<DbId>,
    pub status: Option<String>,
}

async fn load(state: &AppState, ctx: &TenantContext, id: DbId) -> AppResult<TaxForm> {
    let form = TaxFormRepo::find_by_id(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("TaxForm", id))?;
    ensure_owner_or_admin(state, ctx, form.creator_id).await?;
    Ok(form)
}

async fn refused(state: &AppState, ctx: &TenantContext, id: DbId, to: &str) -> AppError {
    match load(state, ctx, id).await {
        Ok(current) => AppError::conflict(
            tax_form::validate_transition(&current.status, to)
                .err()
                .unwrap_or_else(|| "Tax form was modified concurrently".to_string()),
        ),
        Err(e) => e,
    }
}

/// POST /api/v1/tax-forms
pub async fn create(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<SubmitTaxForm>,
) -> AppResult<(StatusCode, Json<DataResponse<TaxForm>>)> {
    tax_form::validate_tax_year(input.tax_year, Utc::now().year()).map_err(AppError::validation)?;
    if input.legal_name.trim().is_empty() {
        return Err(AppError::validation("legal_name must not be empty"));
    }
    let masked = tax_form::mask_tin(&input.form_type, &input.tin_type, input.tin.as_deref())
        .map_err(AppError::validation)?;

    ensure_owner_or_admin(&state, &ctx, input.creator_id).await?;
    CreatorRepo::find_by_id(&state.pool, ctx.slug(), input.creator_id)
        .await?
        .ok_or(AppError::not_found("Creator", input.creator_id))?;

    let form = TaxFormRepo::create(
        &state.pool,
        ctx.slug(),
        &NewTaxForm {
            creator_id: input.creator_id,
            form_type: input.form_type,
            tax_year: input.tax_year,
            legal_name: input.legal_name.trim().to_string(),
            tin_type: masked.tin_type.to_string(),
            tin_last4: masked.last4,
            tin_hash: masked.hash,
        },
    )
    .await?;
    tracing::info!(
        tenant = %ctx.slug,
        tax_form_id = form.id,
        creator_id = form.creator_id,
        form_type = %form.form_type,
        tax_year = form.tax_year,
        "Tax form submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(form))))
}

/// GET /api/v1/tax-forms?creator_id=&status=
///
/// Non-admins must name a creator they are linked to.
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(filter): Query<TaxFormFilter>,
) -> AppResult<Json<DataResponse<Vec<TaxForm>>>> {
    if let Some(status) = filter.status.as_deref() {
        validate_status("tax form", TAX_FORM_STATUSES, status).map_err(AppError::validation)?;
    }
    match filter.creator_id {
        Some(creator_id) => ensure_owner_or_admin(&state, &ctx, creator_id).await?,
        None if !is_tenant_admin(&ctx.user.role) => {
            return Err(AppError::validation("creator_id is required"));
        }
        None => {}
    }
    let forms = TaxFormRepo::list(
        &state.pool,
        ctx.slug(),
        filter.creator_id,
        filter.status.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse::new(forms)))
}

/// GET /api/v1/tax-forms/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaxForm>>> {
    let form = load(&state, &ctx, id).await?;
    Ok(Json(DataResponse::new(form)))
}

/// POST /api/v1/tax-forms/{id}/approve
pub async fn approve(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaxForm>>> {
    match TaxFormRepo::approve(&state.pool, ctx.slug(), id, ctx.user.user_id).await? {
        Some(form) => {
            tracing::info!(tenant = %ctx.slug, tax_form_id = id, reviewer = ctx.user.user_id, "Tax form approved");
            Ok(Json(DataResponse::new(form)))
        }
        None => Err(refused(&state, &ctx, id, TAX_FORM_APPROVED).await),
    }
}

/// POST /api/v1/tax-forms/{id}/reject
pub async fn reject(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectTaxForm>,
) -> AppResult<Json<DataResponse<TaxForm>>> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("A rejection reason is required"));
    }
    match TaxFormRepo::reject(&state.pool, ctx.slug(), id, ctx.user.user_id, reason).await? {
        Some(form) => {
            tracing::info!(tenant = %ctx.slug, tax_form_id = id, reviewer = ctx.user.user_id, "Tax form rejected");
            Ok(Json(DataResponse::new(form)))
        }
        None => Err(refused(&state, &ctx, id, TAX_FORM_REJECTED).await),
    }
}

/// POST /api/v1/tax-forms/{id}/resubmit
pub async fn resubmit(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResubmitTaxForm>,
) -> AppResult<Json<DataResponse<TaxForm>>> {
    let current = load(&state, &ctx, id).await?;
    if current.status != TAX_FORM_REJECTED {
        return Err(AppError::conflict(
            tax_form::validate_transition(&current.status, TAX_FORM_SUBMITTED)
                .err()
                .unwrap_or_else(|| format!("Tax form in status '{}' cannot be resubmitted", current.status)),
        ));
    }
    let legal_name = input.legal_name.as_deref().map(str::trim);
    if legal_name.is_some_and(str::is_empty) {
        return Err(AppError::validation("legal_name must not be empty"));
    }
    let masked = tax_form::mask_tin(&current.form_type, &input.tin_type, input.tin.as_deref())
        .map_err(AppError::validation)?;

    match TaxFormRepo::resubmit(
        &state.pool,
        ctx.slug(),
        id,
        legal_name,
        masked.tin_type,
        masked.last4.as_deref(),
        masked.hash.as_deref(),
    )
    .await?
    {
        Some(form) => {
            tracing::info!(tenant = %ctx.slug, tax_form_id = id, "Tax form resubmitted");
            Ok(Json(DataResponse::new(form)))
        }
        None => Err(refused(&state, &ctx, id, TAX_FORM_SUBMITTED).await),
    }
}
