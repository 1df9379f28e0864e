//! Creator tax form model and DTOs.

use cgk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tax_forms` table. The TIN hash is kept server-side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaxForm {
    pub id: DbId,
    pub tenant_slug: String,
    pub creator_id: DbId,
    pub form_type: String,
    pub tax_year: i32,
    pub legal_name: String,
    pub tin_type: String,
    pub tin_last4: Option<String>,
    #[serde(skip_serializing)]
    pub tin_hash: Option<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for submitting a tax form. `tin` is the raw number and is
/// never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTaxForm {
    pub creator_id: DbId,
    pub form_type: String,
    pub tax_year: i32,
    pub legal_name: String,
    pub tin_type: String,
    pub tin: Option<String>,
}

/// Request body for resubmitting a rejected form.
#[derive(Debug, Clone, Deserialize)]
pub struct ResubmitTaxForm {
    pub legal_name: Option<String>,
    pub tin_type: String,
    pub tin: Option<String>,
}

/// Persistable form after TIN masking.
#[derive(Debug, Clone)]
pub struct NewTaxForm {
    pub creator_id: DbId,
    pub form_type: String,
    pub tax_year: i32,
    pub legal_name: String,
    pub tin_type: String,
    pub tin_last4: Option<String>,
    pub tin_hash: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectTaxForm {
    pub reason: String,
}
