//! Handlers for `/esign` documents.
//!
//! Document management is admin-only and tenant-scoped. The signer
//! endpoints under `/esign/sign/{token}` are public: the access token is
//! the credential and it also identifies the tenant.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use cgk_core::error::CoreError;
use cgk_core::esign::{self, SignerSpec, DOCUMENT_STATUSES, DOCUMENT_VOIDED};
use cgk_core::state_machine::validate_status;
use cgk_core::types::DbId;
use cgk_db::models::esign::{
    CreateEsignDocument, DeclineDocument, DocumentWithSigners, EsignAuditEntry, EsignDocument,
    SignDocument, SigningSession, VoidDocument,
};
use cgk_db::repositories::esign_repo::SignerAction;
use cgk_db::repositories::EsignRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of a typed signature.
const MAX_SIGNATURE_LEN: usize = 200;

/// First address in `X-Forwarded-For`, as set by the load balancer.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn signer_result(action: SignerAction) -> AppResult<SigningSession> {
    match action {
        SignerAction::Done(session) => Ok(session),
        SignerAction::UnknownToken => Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Signing link",
            key: "token".to_string(),
        })),
        SignerAction::DocumentClosed { status } => Err(AppError::conflict(format!(
            "Document is {status} and no longer accepts signer actions"
        ))),
        SignerAction::SignerClosed { status } => {
            Err(AppError::conflict(format!("Signer has already {status}")))
        }
        SignerAction::OutOfOrder(msg) => Err(AppError::conflict(msg)),
    }
}

/// POST /api/v1/esign/documents
pub async fn create(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateEsignDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<DocumentWithSigners>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    if input.document_url.trim().is_empty() {
        return Err(AppError::validation("document_url must not be empty"));
    }
    let specs: Vec<SignerSpec<'_>> = input
        .signers
        .iter()
        .map(|s| SignerSpec {
            name: &s.name,
            email: &s.email,
            signing_order: s.signing_order.unwrap_or(1),
        })
        .collect();
    esign::validate_signers(&specs).map_err(AppError::validation)?;

    let ip = client_ip(&headers);
    let created =
        EsignRepo::create(&state.pool, ctx.slug(), ctx.user.user_id, &input, ip.as_deref()).await?;
    tracing::info!(
        tenant = %ctx.slug,
        document_id = created.document.id,
        signers = created.signers.len(),
        "E-sign document created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/v1/esign/documents?status=&limit=&offset=
pub async fn list(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<EsignDocument>>>> {
    if let Some(status) = params.status.as_deref() {
        validate_status("document", DOCUMENT_STATUSES, status).map_err(AppError::validation)?;
    }
    let (limit, offset) = params.page();
    let documents = EsignRepo::list_documents(
        &state.pool,
        ctx.slug(),
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse::new(documents)))
}

/// GET /api/v1/esign/documents/{id}
pub async fn get_by_id(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DocumentWithSigners>>> {
    let document = EsignRepo::find_with_signers(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("EsignDocument", id))?;
    Ok(Json(DataResponse::new(document)))
}

/// GET /api/v1/esign/documents/{id}/audit
pub async fn audit(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EsignAuditEntry>>>> {
    EsignRepo::find_document(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("EsignDocument", id))?;
    let entries = EsignRepo::list_audit(&state.pool, ctx.slug(), id).await?;
    Ok(Json(DataResponse::new(entries)))
}

/// POST /api/v1/esign/documents/{id}/void
pub async fn void(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<VoidDocument>,
) -> AppResult<Json<DataResponse<EsignDocument>>> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("A void reason is required"));
    }
    let ip = client_ip(&headers);
    match EsignRepo::void(&state.pool, ctx.slug(), id, reason, ctx.user.user_id, ip.as_deref())
        .await?
    {
        Some(document) => {
            tracing::info!(tenant = %ctx.slug, document_id = id, "E-sign document voided");
            Ok(Json(DataResponse::new(document)))
        }
        None => {
            let current = EsignRepo::find_document(&state.pool, ctx.slug(), id)
                .await?
                .ok_or(AppError::not_found("EsignDocument", id))?;
            Err(AppError::conflict(
                esign::validate_document_transition(&current.status, DOCUMENT_VOIDED)
                    .err()
                    .unwrap_or_else(|| "Document was modified concurrently".to_string()),
            ))
        }
    }
}

/// GET /api/v1/esign/sign/{token}
///
/// Opening the link marks a pending signer as viewed.
pub async fn open(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<SigningSession>>> {
    let ip = client_ip(&headers);
    let session = signer_result(EsignRepo::open(&state.pool, token, ip.as_deref()).await?)?;
    Ok(Json(DataResponse::new(session)))
}

/// POST /api/v1/esign/sign/{token}
pub async fn sign(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<SignDocument>,
) -> AppResult<Json<DataResponse<SigningSession>>> {
    let signature = input.signature_text.trim();
    if signature.is_empty() {
        return Err(AppError::validation("signature_text must not be empty"));
    }
    if signature.chars().count() > MAX_SIGNATURE_LEN {
        return Err(AppError::validation(format!(
            "signature_text must be at most {MAX_SIGNATURE_LEN} characters"
        )));
    }
    let ip = client_ip(&headers);
    let session =
        signer_result(EsignRepo::sign(&state.pool, token, signature, ip.as_deref()).await?)?;
    tracing::info!(
        tenant = %session.document.tenant_slug,
        document_id = session.document.id,
        signer_id = session.signer.id,
        document_status = %session.document.status,
        "Document signed"
    );
    Ok(Json(DataResponse::new(session)))
}

/// POST /api/v1/esign/sign/{token}/decline
pub async fn decline(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<DeclineDocument>,
) -> AppResult<Json<DataResponse<SigningSession>>> {
    let reason = input.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let ip = client_ip(&headers);
    let session =
        signer_result(EsignRepo::decline(&state.pool, token, reason, ip.as_deref()).await?)?;
    tracing::info!(
        tenant = %session.document.tenant_slug,
        document_id = session.document.id,
        signer_id = session.signer.id,
        "Document declined"
    );
    Ok(Json(DataResponse::new(session)))
}
