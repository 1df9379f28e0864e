//! Limit/offset clamping shared by list endpoints.

/// Default page size when the client does not ask for one.
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a user-provided limit into `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
