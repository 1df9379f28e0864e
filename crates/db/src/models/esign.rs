//! E-signature documents, signers and audit log.

use cgk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `esign_documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EsignDocument {
    pub id: DbId,
    pub tenant_slug: String,
    pub title: String,
    pub document_url: String,
    pub message: Option<String>,
    pub status: String,
    pub created_by: DbId,
    pub completed_at: Option<Timestamp>,
    pub voided_at: Option<Timestamp>,
    pub void_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `esign_signers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EsignSigner {
    pub id: DbId,
    pub tenant_slug: String,
    pub document_id: DbId,
    pub name: String,
    pub email: String,
    pub signing_order: i32,
    pub status: String,
    pub access_token: Uuid,
    pub viewed_at: Option<Timestamp>,
    pub signed_at: Option<Timestamp>,
    pub declined_at: Option<Timestamp>,
    pub decline_reason: Option<String>,
    pub signature_text: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `esign_audit_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EsignAuditEntry {
    pub id: DbId,
    pub tenant_slug: String,
    pub document_id: DbId,
    pub signer_id: Option<DbId>,
    pub action: String,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSigner {
    pub name: String,
    pub email: String,
    /// Defaults to 1 (parallel signing) if omitted.
    pub signing_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEsignDocument {
    pub title: String,
    pub document_url: String,
    pub message: Option<String>,
    pub signers: Vec<CreateSigner>,
}

/// A document together with its signers, ordered by `signing_order`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithSigners {
    #[serde(flatten)]
    pub document: EsignDocument,
    pub signers: Vec<EsignSigner>,
}

/// What a signer sees when opening their link.
#[derive(Debug, Clone, Serialize)]
pub struct SigningSession {
    pub document: EsignDocument,
    pub signer: EsignSigner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignDocument {
    pub signature_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclineDocument {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoidDocument {
    pub reason: String,
}

/// Audit entry insert DTO.
#[derive(Debug, Clone)]
pub struct NewAuditEntry<'a> {
    pub tenant_slug: &'a str,
    pub document_id: DbId,
    pub signer_id: Option<DbId>,
    pub action: &'a str,
    pub details: serde_json::Value,
    pub ip_address: Option<&'a str>,
}
