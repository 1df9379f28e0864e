//! Handlers for the tenant `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cgk_core::creator::validate_email;
use cgk_core::roles::validate_tenant_role;
use cgk_db::models::user::{CreateUser, UserResponse};
use cgk_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub role: String,
}

/// GET /api/v1/users
pub async fn list(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_for_tenant(&state.pool, ctx.slug()).await?;
    Ok(Json(DataResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/v1/users
pub async fn create(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_email(&input.email).map_err(AppError::validation)?;
    validate_tenant_role(&input.role).map_err(AppError::validation)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;
    if input.display_name.trim().is_empty() {
        return Err(AppError::validation("display_name must not be empty"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            tenant_slug: Some(ctx.slug.clone()),
            email: input.email.trim().to_string(),
            display_name: input.display_name.trim().to_string(),
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(tenant = %ctx.slug, user_id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(user.into()))))
}
