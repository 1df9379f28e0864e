//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] or [`TenantContext`] and rejects
//! requests whose role does not meet the requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cgk_core::roles::{is_tenant_admin, ROLE_SUPER_ADMIN};

use super::auth::AuthUser;
use super::tenant::TenantContext;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires the `super_admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequirePlatformAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequirePlatformAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_SUPER_ADMIN {
            return Err(AppError::forbidden("Platform operator role required"));
        }
        Ok(RequirePlatformAdmin(user))
    }
}

/// A resolved tenant whose caller is a tenant admin (or a platform
/// operator acting on it).
///
/// ```ignore
/// async fn admin_only(TenantAdmin(ctx): TenantAdmin) -> AppResult<StatusCode> {
///     tracing::info!(tenant = %ctx.slug, "admin action");
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct TenantAdmin(pub TenantContext);

impl FromRequestParts<AppState> for TenantAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = TenantContext::from_request_parts(parts, state).await?;
        ensure_admin(&ctx)?;
        Ok(TenantAdmin(ctx))
    }
}

/// Reject unless the caller of `ctx` is a tenant admin.
pub fn ensure_admin(ctx: &TenantContext) -> AppResult<()> {
    if !is_tenant_admin(&ctx.user.role) {
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(())
}
