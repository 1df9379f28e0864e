//! Route definitions for the `/draw-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::draw_requests;
use crate::state::AppState;

/// Routes mounted at `/draw-requests`.
///
/// ```text
/// GET  /                 -> list (contractors see their own)
/// POST /                 -> create
/// GET  /{id}             -> get_by_id
/// POST /{id}/approve     -> approve (admin)
/// POST /{id}/reject      -> reject (admin)
/// POST /{id}/mark-paid   -> mark_paid (admin)
/// POST /{id}/cancel      -> cancel (owner or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(draw_requests::list).post(draw_requests::create))
        .route("/{id}", get(draw_requests::get_by_id))
        .route("/{id}/approve", post(draw_requests::approve))
        .route("/{id}/reject", post(draw_requests::reject))
        .route("/{id}/mark-paid", post(draw_requests::mark_paid))
        .route("/{id}/cancel", post(draw_requests::cancel))
}
