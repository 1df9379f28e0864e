//! Repository for e-signature documents, signers and the audit log.
//!
//! Every workflow step runs inside a tenant-scoped transaction so the
//! signer row, the document row and the audit entries commit together.
//! Document and signer rows are locked with `FOR UPDATE` before the
//! ordering and completion rules are evaluated.

use cgk_core::esign::{
    self, SignerState, ACTIONABLE_SIGNER_STATUSES, AUDIT_COMPLETED, AUDIT_CREATED, AUDIT_DECLINED,
    AUDIT_SIGNED, AUDIT_VIEWED, AUDIT_VOIDED, DOCUMENT_COMPLETED, DOCUMENT_DECLINED,
    DOCUMENT_VOIDED, OPEN_DOCUMENT_STATUSES, SIGNER_DECLINED, SIGNER_PENDING, SIGNER_SIGNED,
    SIGNER_VIEWED,
};
use cgk_core::types::DbId;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::esign::{
    CreateEsignDocument, DocumentWithSigners, EsignAuditEntry, EsignDocument, EsignSigner,
    NewAuditEntry, SigningSession,
};
use crate::tenant;

const DOCUMENT_COLUMNS: &str = "id, tenant_slug, title, document_url, message, status, created_by, \
                                 completed_at, voided_at, void_reason, created_at, updated_at";

const SIGNER_COLUMNS: &str = "id, tenant_slug, document_id, name, email, signing_order, status, \
                               access_token, viewed_at, signed_at, declined_at, decline_reason, \
                               signature_text, created_at, updated_at";

const AUDIT_COLUMNS: &str =
    "id, tenant_slug, document_id, signer_id, action, details, ip_address, created_at";

/// Result of a signer-initiated action (open, sign, decline).
#[derive(Debug)]
pub enum SignerAction {
    /// The action was applied (or was a no-op for a repeated view).
    Done(SigningSession),
    /// No signer holds the access token.
    UnknownToken,
    /// The document is no longer pending or in progress.
    DocumentClosed { status: String },
    /// The signer has already signed or declined.
    SignerClosed { status: String },
    /// Earlier signers still have to sign.
    OutOfOrder(String),
}

pub struct EsignRepo;

impl EsignRepo {
    /// Create a document with its signers and a `created` audit entry.
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        created_by: DbId,
        input: &CreateEsignDocument,
        ip_address: Option<&str>,
    ) -> Result<DocumentWithSigners, sqlx::Error> {
        let mut tx = tenant::begin(pool, tenant_slug).await?;

        let query = format!(
            "INSERT INTO esign_documents (tenant_slug, title, document_url, message, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let document = sqlx::query_as::<_, EsignDocument>(&query)
            .bind(tenant_slug)
            .bind(&input.title)
            .bind(&input.document_url)
            .bind(&input.message)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO esign_signers
                (tenant_slug, document_id, name, email, signing_order, access_token)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SIGNER_COLUMNS}"
        );
        let mut signers = Vec::with_capacity(input.signers.len());
        for signer in &input.signers {
            let row = sqlx::query_as::<_, EsignSigner>(&query)
                .bind(tenant_slug)
                .bind(document.id)
                .bind(signer.name.trim())
                .bind(signer.email.trim())
                .bind(signer.signing_order.unwrap_or(1))
                .bind(Uuid::new_v4())
                .fetch_one(&mut *tx)
                .await?;
            signers.push(row);
        }
        signers.sort_by_key(|s| (s.signing_order, s.id));

        insert_audit(
            &mut tx,
            &NewAuditEntry {
                tenant_slug,
                document_id: document.id,
                signer_id: None,
                action: AUDIT_CREATED,
                details: json!({ "created_by": created_by, "signer_count": signers.len() }),
                ip_address,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(DocumentWithSigners { document, signers })
    }

    pub async fn find_document(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<EsignDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM esign_documents WHERE tenant_slug = $1 AND id = $2"
        );
        sqlx::query_as::<_, EsignDocument>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a document together with its signers.
    pub async fn find_with_signers(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<DocumentWithSigners>, sqlx::Error> {
        let Some(document) = Self::find_document(pool, tenant_slug, id).await? else {
            return Ok(None);
        };
        let signers = Self::list_signers(pool, tenant_slug, id).await?;
        Ok(Some(DocumentWithSigners { document, signers }))
    }

    pub async fn list_documents(
        pool: &PgPool,
        tenant_slug: &str,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EsignDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM esign_documents
             WHERE tenant_slug = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, EsignDocument>(&query)
            .bind(tenant_slug)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn list_signers(
        pool: &PgPool,
        tenant_slug: &str,
        document_id: DbId,
    ) -> Result<Vec<EsignSigner>, sqlx::Error> {
        let query = format!(
            "SELECT {SIGNER_COLUMNS} FROM esign_signers
             WHERE tenant_slug = $1 AND document_id = $2
             ORDER BY signing_order ASC, id ASC"
        );
        sqlx::query_as::<_, EsignSigner>(&query)
            .bind(tenant_slug)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// The audit trail of a document, oldest first.
    pub async fn list_audit(
        pool: &PgPool,
        tenant_slug: &str,
        document_id: DbId,
    ) -> Result<Vec<EsignAuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {AUDIT_COLUMNS} FROM esign_audit_log
             WHERE tenant_slug = $1 AND document_id = $2
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, EsignAuditEntry>(&query)
            .bind(tenant_slug)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Void an open document. Returns `None` if it is missing or closed.
    pub async fn void(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        reason: &str,
        voided_by: DbId,
        ip_address: Option<&str>,
    ) -> Result<Option<EsignDocument>, sqlx::Error> {
        let mut tx = tenant::begin(pool, tenant_slug).await?;
        let query = format!(
            "UPDATE esign_documents SET status = $3, voided_at = NOW(), void_reason = $4
             WHERE tenant_slug = $1 AND id = $2 AND status = ANY($5)
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let document = sqlx::query_as::<_, EsignDocument>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(DOCUMENT_VOIDED)
            .bind(reason)
            .bind(OPEN_DOCUMENT_STATUSES)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(document) = document else {
            return Ok(None);
        };

        insert_audit(
            &mut tx,
            &NewAuditEntry {
                tenant_slug,
                document_id: id,
                signer_id: None,
                action: AUDIT_VOIDED,
                details: json!({ "reason": reason, "voided_by": voided_by }),
                ip_address,
            },
        )
        .await?;
        tx.commit().await?;
        Ok(Some(document))
    }

    /// Look up a signer and their document by access token.
    pub async fn find_session(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<SigningSession>, sqlx::Error> {
        let query = format!("SELECT {SIGNER_COLUMNS} FROM esign_signers WHERE access_token = $1");
        let Some(signer) = sqlx::query_as::<_, EsignSigner>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let document =
            Self::find_document(pool, &signer.tenant_slug, signer.document_id).await?;
        Ok(document.map(|document| SigningSession { document, signer }))
    }

    /// A signer opens their link. The first view moves a pending signer
    /// to `viewed` and is audited; later views change nothing.
    pub async fn open(
        pool: &PgPool,
        token: Uuid,
        ip_address: Option<&str>,
    ) -> Result<SignerAction, sqlx::Error> {
        let Some(session) = Self::find_session(pool, token).await? else {
            return Ok(SignerAction::UnknownToken);
        };
        if !esign::is_document_open(&session.document.status) {
            return Ok(SignerAction::DocumentClosed {
                status: session.document.status,
            });
        }
        if session.signer.status != SIGNER_PENDING {
            return Ok(SignerAction::Done(session));
        }

        let tenant_slug = session.signer.tenant_slug.clone();
        let mut tx = tenant::begin(pool, &tenant_slug).await?;
        let query = format!(
            "UPDATE esign_signers SET status = $2, viewed_at = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {SIGNER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, EsignSigner>(&query)
            .bind(session.signer.id)
            .bind(SIGNER_VIEWED)
            .bind(SIGNER_PENDING)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(signer) = updated else {
            // Lost a race with another request from the same signer.
            tx.rollback().await?;
            return Ok(SignerAction::Done(session));
        };

        insert_audit(
            &mut tx,
            &NewAuditEntry {
                tenant_slug: &tenant_slug,
                document_id: signer.document_id,
                signer_id: Some(signer.id),
                action: AUDIT_VIEWED,
                details: json!({ "email": signer.email }),
                ip_address,
            },
        )
        .await?;
        tx.commit().await?;

        Ok(SignerAction::Done(SigningSession {
            document: session.document,
            signer,
        }))
    }

    /// Record a signature, advancing the document to `in_progress` or
    /// `completed`.
    pub async fn sign(
        pool: &PgPool,
        token: Uuid,
        signature_text: &str,
        ip_address: Option<&str>,
    ) -> Result<SignerAction, sqlx::Error> {
        let Some(session) = Self::find_session(pool, token).await? else {
            return Ok(SignerAction::UnknownToken);
        };
        let tenant_slug = session.signer.tenant_slug.clone();
        let signer_id = session.signer.id;
        let document_id = session.document.id;

        let mut tx = tenant::begin(pool, &tenant_slug).await?;
        let (document, signers) = lock_document(&mut tx, &tenant_slug, document_id).await?;
        if let Some(blocked) = check_actionable(&document, &signers, signer_id) {
            return Ok(blocked);
        }

        let states: Vec<SignerState<'_>> = signers
            .iter()
            .map(|s| SignerState {
                id: s.id,
                signing_order: s.signing_order,
                status: &s.status,
            })
            .collect();
        if let Err(msg) = esign::check_signing_order(signer_id, &states) {
            return Ok(SignerAction::OutOfOrder(msg));
        }
        let next_status = esign::document_status_after_signature(signer_id, &states);

        let query = format!(
            "UPDATE esign_signers SET status = $2, signed_at = NOW(), signature_text = $3
             WHERE id = $1
             RETURNING {SIGNER_COLUMNS}"
        );
        let signer = sqlx::query_as::<_, EsignSigner>(&query)
            .bind(signer_id)
            .bind(SIGNER_SIGNED)
            .bind(signature_text)
            .fetch_one(&mut *tx)
            .await?;
        insert_audit(
            &mut tx,
            &NewAuditEntry {
                tenant_slug: &tenant_slug,
                document_id,
                signer_id: Some(signer_id),
                action: AUDIT_SIGNED,
                details: json!({ "email": signer.email, "signature_text": signature_text }),
                ip_address,
            },
        )
        .await?;

        let query = format!(
            "UPDATE esign_documents SET
                status = $2,
                completed_at = CASE WHEN $2 = '{DOCUMENT_COMPLETED}' THEN NOW() ELSE completed_at END
             WHERE id = $1
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let document = sqlx::query_as::<_, EsignDocument>(&query)
            .bind(document_id)
            .bind(next_status)
            .fetch_one(&mut *tx)
            .await?;
        if document.status == DOCUMENT_COMPLETED {
            insert_audit(
                &mut tx,
                &NewAuditEntry {
                    tenant_slug: &tenant_slug,
                    document_id,
                    signer_id: None,
                    action: AUDIT_COMPLETED,
                    details: json!({ "signer_count": signers.len() }),
                    ip_address,
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(SignerAction::Done(SigningSession { document, signer }))
    }

    /// A signer declines; the whole document becomes `declined`.
    pub async fn decline(
        pool: &PgPool,
        token: Uuid,
        reason: Option<&str>,
        ip_address: Option<&str>,
    ) -> Result<SignerAction, sqlx::Error> {
        let Some(session) = Self::find_session(pool, token).await? else {
            return Ok(SignerAction::UnknownToken);
        };
        let tenant_slug = session.signer.tenant_slug.clone();
        let signer_id = session.signer.id;
        let document_id = session.document.id;

        let mut tx = tenant::begin(pool, &tenant_slug).await?;
        let (document, signers) = lock_document(&mut tx, &tenant_slug, document_id).await?;
        if let Some(blocked) = check_actionable(&document, &signers, signer_id) {
            return Ok(blocked);
        }

        let query = format!(
            "UPDATE esign_signers SET status = $2, declined_at = NOW(), decline_reason = $3
             WHERE id = $1
             RETURNING {SIGNER_COLUMNS}"
        );
        let signer = sqlx::query_as::<_, EsignSigner>(&query)
            .bind(signer_id)
            .bind(SIGNER_DECLINED)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE esign_documents SET status = $2 WHERE id = $1 RETURNING {DOCUMENT_COLUMNS}"
        );
        let document = sqlx::query_as::<_, EsignDocument>(&query)
            .bind(document_id)
            .bind(DOCUMENT_DECLINED)
            .fetch_one(&mut *tx)
            .await?;

        insert_audit(
            &mut tx,
            &NewAuditEntry {
                tenant_slug: &tenant_slug,
                document_id,
                signer_id: Some(signer_id),
                action: AUDIT_DECLINED,
                details: json!({ "email": signer.email, "reason": reason }),
                ip_address,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(SignerAction::Done(SigningSession { document, signer }))
    }
}

/// Lock a document row and all of its signer rows for the rest of the
/// transaction.
async fn lock_document(
    conn: &mut PgConnection,
    tenant_slug: &str,
    document_id: DbId,
) -> Result<(EsignDocument, Vec<EsignSigner>), sqlx::Error> {
    let query = format!(
        "SELECT {DOCUMENT_COLUMNS} FROM esign_documents
         WHERE tenant_slug = $1 AND id = $2
         FOR UPDATE"
    );
    let document = sqlx::query_as::<_, EsignDocument>(&query)
        .bind(tenant_slug)
        .bind(document_id)
        .fetch_one(&mut *conn)
        .await?;

    let query = format!(
        "SELECT {SIGNER_COLUMNS} FROM esign_signers
         WHERE tenant_slug = $1 AND document_id = $2
         ORDER BY signing_order ASC, id ASC
         FOR UPDATE"
    );
    let signers = sqlx::query_as::<_, EsignSigner>(&query)
        .bind(tenant_slug)
        .bind(document_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok((document, signers))
}

/// Reject actions on closed documents or on signers that already acted.
fn check_actionable(
    document: &EsignDocument,
    signers: &[EsignSigner],
    signer_id: DbId,
) -> Option<SignerAction> {
    if !esign::is_document_open(&document.status) {
        return Some(SignerAction::DocumentClosed {
            status: document.status.clone(),
        });
    }
    let status = signers
        .iter()
        .find(|s| s.id == signer_id)
        .map(|s| s.status.as_str())
        .unwrap_or(SIGNER_DECLINED);
    if !ACTIONABLE_SIGNER_STATUSES.contains(&status) {
        return Some(SignerAction::SignerClosed {
            status: status.to_string(),
        });
    }
    None
}

async fn insert_audit(
    conn: &mut PgConnection,
    entry: &NewAuditEntry<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO esign_audit_log (tenant_slug, document_id, signer_id, action, details, ip_address)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(entry.tenant_slug)
    .bind(entry.document_id)
    .bind(entry.signer_id)
    .bind(entry.action)
    .bind(&entry.details)
    .bind(entry.ip_address)
    .execute(conn)
    .await?;
    Ok(())
}
