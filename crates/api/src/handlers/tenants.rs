//! Platform-operator handlers for `/platform/tenants`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cgk_core::error::CoreError;
use cgk_core::state_machine::validate_status;
use cgk_core::tenant::{validate_slug, TENANT_STATUSES};
use cgk_db::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use cgk_db::repositories::TenantRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn tenant_not_found(slug: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Tenant",
        key: slug.to_string(),
    })
}

/// POST /api/v1/platform/tenants
pub async fn create(
    RequirePlatformAdmin(user): RequirePlatformAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTenant>,
) -> AppResult<(StatusCode, Json<DataResponse<Tenant>>)> {
    validate_slug(&input.slug).map_err(AppError::validation)?;
    if input.name.trim().is_empty() {
        return Err(AppError::validation("Tenant name must not be empty"));
    }

    let tenant = TenantRepo::create(&state.pool, &input).await?;
    tracing::info!(slug = %tenant.slug, operator = user.user_id, "Tenant created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(tenant))))
}

/// GET /api/v1/platform/tenants
pub async fn list(
    RequirePlatformAdmin(_): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Tenant>>>> {
    let tenants = TenantRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(tenants)))
}

/// GET /api/v1/platform/tenants/{slug}
pub async fn get_by_slug(
    RequirePlatformAdmin(_): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Tenant>>> {
    let tenant = TenantRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| tenant_not_found(&slug))?;
    Ok(Json(DataResponse::new(tenant)))
}

/// PUT /api/v1/platform/tenants/{slug}
pub async fn update(
    RequirePlatformAdmin(user): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateTenant>,
) -> AppResult<Json<DataResponse<Tenant>>> {
    if let Some(status) = &input.status {
        validate_status("tenant", TENANT_STATUSES, status).map_err(AppError::validation)?;
    }
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Tenant name must not be empty"));
    }

    let tenant = TenantRepo::update(&state.pool, &slug, &input)
        .await?
        .ok_or_else(|| tenant_not_found(&slug))?;
    tracing::info!(slug = %tenant.slug, status = %tenant.status, operator = user.user_id, "Tenant updated");
    Ok(Json(DataResponse::new(tenant)))
}
