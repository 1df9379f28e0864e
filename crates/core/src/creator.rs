//! Creator statuses and field validation.

pub const CREATOR_PENDING: &str = "pending";
pub const CREATOR_ACTIVE: &str = "active";
pub const CREATOR_INACTIVE: &str = "inactive";

pub const CREATOR_STATUSES: &[&str] = &[CREATOR_PENDING, CREATOR_ACTIVE, CREATOR_INACTIVE];

/// Validate a commission percentage (inclusive 0-100).
pub fn validate_commission_percent(percent: i32) -> Result<(), String> {
    if (0..=100).contains(&percent) {
        Ok(())
    } else {
        Err(format!(
            "commission_percent must be between 0 and 100, got {percent}"
        ))
    }
}

/// Minimal structural email check: one `@`, non-empty local part and a
/// dotted domain. Deliverability is not our concern.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("'{email}' is not a valid email address"))
    }
}
