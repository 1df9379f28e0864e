//! Route definitions for the `/subscriptions` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// GET  /                   -> list (?status, limit, offset)
/// POST /                   -> create
/// GET  /due                -> due (?on=YYYY-MM-DD)
/// GET  /{id}               -> get_by_id
/// POST /{id}/skip          -> skip
/// POST /{id}/pause         -> pause
/// POST /{id}/resume        -> resume
/// POST /{id}/reschedule    -> reschedule
/// PUT  /{id}/frequency     -> change_frequency
/// POST /{id}/cancel        -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subscriptions::list).post(subscriptions::create))
        .route("/due", get(subscriptions::due))
        .route("/{id}", get(subscriptions::get_by_id))
        .route("/{id}/skip", post(subscriptions::skip))
        .route("/{id}/pause", post(subscriptions::pause))
        .route("/{id}/resume", post(subscriptions::resume))
        .route("/{id}/reschedule", post(subscriptions::reschedule))
        .route("/{id}/frequency", put(subscriptions::change_frequency))
        .route("/{id}/cancel", post(subscriptions::cancel))
}
