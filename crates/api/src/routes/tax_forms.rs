//! Route definitions for the `/tax-forms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tax_forms;
use crate::state::AppState;

/// Routes mounted at `/tax-forms`.
///
/// ```text
/// GET  /                -> list (?creator_id, status)
/// POST /                -> create
/// GET  /{id}            -> get_by_id
/// POST /{id}/approve    -> approve (admin)
/// POST /{id}/reject     -> reject (admin)
/// POST /{id}/resubmit   -> resubmit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tax_forms::list).post(tax_forms::create))
        .route("/{id}", get(tax_forms::get_by_id))
        .route("/{id}/approve", post(tax_forms::approve))
        .route("/{id}/reject", post(tax_forms::reject))
        .route("/{id}/resubmit", post(tax_forms::resubmit))
}
