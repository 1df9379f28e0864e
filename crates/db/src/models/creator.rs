//! Creator model and DTOs.

use cgk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `creators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creator {
    pub id: DbId,
    pub tenant_slug: String,
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub status: String,
    pub commission_percent: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCreator {
    pub user_id: Option<DbId>,
    pub name: String,
    pub email: String,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
    /// Defaults to 0 if omitted.
    pub commission_percent: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCreator {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub commission_percent: Option<i32>,
}
