//! Contractor draw request model and DTOs.

use cgk_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `draw_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DrawRequest {
    pub id: DbId,
    pub tenant_slug: String,
    pub contractor_id: DbId,
    pub amount_cents: Cents,
    pub description: Option<String>,
    pub status: String,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub review_note: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a draw request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrawRequest {
    /// Only honoured for admins; contractors always draw for themselves.
    pub contractor_id: Option<DbId>,
    pub amount_cents: Cents,
    pub description: Option<String>,
}

/// Review decision payload for approve / reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewDrawRequest {
    pub note: Option<String>,
}
