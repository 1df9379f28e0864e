//! Authentication, authorization and tenant-resolution extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`tenant::TenantContext`] -- Resolves the tenant a request operates on.
//! - [`rbac::TenantAdmin`] -- Tenant context whose user is a tenant admin.
//! - [`rbac::RequirePlatformAdmin`] -- Requires the `super_admin` role.

pub mod auth;
pub mod rbac;
pub mod tenant;
