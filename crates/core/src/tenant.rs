//! Tenant slug rules and tenant statuses.
//!
//! The slug is the scoping key stamped on every tenant-owned row, so it is
//! validated once here and never re-derived.

pub const TENANT_ACTIVE: &str = "active";
pub const TENANT_SUSPENDED: &str = "suspended";

pub const TENANT_STATUSES: &[&str] = &[TENANT_ACTIVE, TENANT_SUSPENDED];

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 48;

/// Validate a tenant slug: 3-48 chars of `[a-z0-9-]`, no leading,
/// trailing or doubled hyphens.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    let len = slug.len();
    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
        return Err(format!(
            "Tenant slug must be between {SLUG_MIN_LEN} and {SLUG_MAX_LEN} characters"
        ));
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err("Tenant slug may only contain lowercase letters, digits and hyphens".into());
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err("Tenant slug must not start or end with a hyphen or contain '--'".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_slugs() {
        assert!(validate_slug("acme").is_ok());
        assert!(validate_slug("rawdog-2").is_ok());
        assert!(validate_slug("abc").is_ok());
    }

    #[test]
    fn rejects_bad_length() {
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug(&"a".repeat(49)).is_err());
        assert!(validate_slug(&"a".repeat(48)).is_ok());
    }

    #[test]
    fn rejects_uppercase_and_symbols() {
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("acme_co").is_err());
        assert!(validate_slug("acme co").is_err());
    }

    #[test]
    fn rejects_hyphen_placement() {
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("acme-").is_err());
        assert!(validate_slug("ac--me").is_err());
    }
}
