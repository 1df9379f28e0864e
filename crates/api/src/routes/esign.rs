//! Route definitions for the `/esign` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::esign;
use crate::state::AppState;

/// Routes mounted at `/esign`.
///
/// `/documents` routes require a tenant admin. `/sign/{token}` routes are
/// public and authorised by the signer's access token.
///
/// ```text
/// GET  /documents              -> list
/// POST /documents              -> create
/// GET  /documents/{id}         -> get_by_id
/// GET  /documents/{id}/audit   -> audit
/// POST /documents/{id}/void    -> void
/// GET  /sign/{token}           -> open
/// POST /sign/{token}/sign      -> sign
/// POST /sign/{token}/decline   -> decline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents", get(esign::list).post(esign::create))
        .route("/documents/{id}", get(esign::get_by_id))
        .route("/documents/{id}/audit", get(esign::audit))
        .route("/documents/{id}/void", post(esign::void))
        .route("/sign/{token}", get(esign::open))
        .route("/sign/{token}/sign", post(esign::sign))
        .route("/sign/{token}/decline", post(esign::decline))
}
