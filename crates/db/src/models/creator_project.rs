//! Creator project model and DTOs.

use cgk_core::types::{Cents, DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `creator_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreatorProject {
    pub id: DbId,
    pub tenant_slug: String,
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub budget_cents: Cents,
    pub due_date: Option<NaiveDate>,
    pub revision_note: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCreatorProject {
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub budget_cents: Option<Cents>,
    pub due_date: Option<NaiveDate>,
}

/// Content edits; only allowed while the project is editable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCreatorProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget_cents: Option<Cents>,
    pub due_date: Option<NaiveDate>,
}

/// Query filters for listing projects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorProjectFilter {
    pub creator_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
