//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in the initial migration.

/// Platform operator. Not bound to a tenant; acts on one via `X-Tenant-Slug`.
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CREATOR: &str = "creator";
pub const ROLE_CONTRACTOR: &str = "contractor";

/// Roles a tenant admin may assign when creating users.
pub const TENANT_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CREATOR, ROLE_CONTRACTOR];

/// Validate that `role` can be assigned to a tenant user.
pub fn validate_tenant_role(role: &str) -> Result<(), String> {
    if TENANT_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            TENANT_ROLES.join(", ")
        ))
    }
}

/// Whether the role carries admin rights inside a tenant.
pub fn is_tenant_admin(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPER_ADMIN
}
