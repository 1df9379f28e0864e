//! Tenant resolution for tenant-scoped routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cgk_core::roles::ROLE_SUPER_ADMIN;
use cgk_core::tenant::validate_slug;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Header a platform operator uses to pick the tenant to act on.
pub const TENANT_HEADER: &str = "x-tenant-slug";

/// The tenant a request operates on, plus the caller.
///
/// Resolution:
/// - tenant users are bound to the `tenant` claim of their token; an
///   `X-Tenant-Slug` header naming another tenant is rejected with 403;
/// - platform operators (`super_admin`) must name a tenant with
///   `X-Tenant-Slug`;
/// - no tenant at all is a 400.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub slug: String,
    pub user: AuthUser,
}

impl TenantContext {
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let header = match parts.headers.get(TENANT_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::BadRequest("Invalid X-Tenant-Slug header".into()))?
                    .trim()
                    .to_string(),
            ),
            None => None,
        };

        let slug = match (&user.tenant, header) {
            (Some(own), Some(requested)) if *own != requested => {
                tracing::warn!(
                    user_id = user.user_id,
                    tenant = %own,
                    requested = %requested,
                    "Cross-tenant access attempt rejected"
                );
                return Err(AppError::forbidden("Access to another tenant is not allowed"));
            }
            (Some(own), _) => own.clone(),
            (None, Some(requested)) if user.role == ROLE_SUPER_ADMIN => {
                validate_slug(&requested).map_err(AppError::BadRequest)?;
                requested
            }
            (None, Some(_)) => {
                return Err(AppError::forbidden("User is not assigned to a tenant"));
            }
            (None, None) => {
                return Err(AppError::BadRequest(
                    "No tenant selected. Send the X-Tenant-Slug header".into(),
                ));
            }
        };

        Ok(TenantContext { slug, user })
    }
}
