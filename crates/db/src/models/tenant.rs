//! Tenant (customer organization) model and DTOs.

use cgk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenant {
    pub slug: String,
    pub name: String,
}

/// DTO for updating a tenant. The slug is immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub status: Option<String>,
}
