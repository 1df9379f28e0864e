//! Route definitions for the `/creator-projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::creator_projects;
use crate::state::AppState;

/// Routes mounted at `/creator-projects`.
///
/// ```text
/// GET  /                        -> list (?creator_id, status, limit, offset)
/// POST /                        -> create
/// GET  /{id}                    -> get_by_id
/// PUT  /{id}                    -> update (draft / revision_requested only)
/// POST /{id}/submit             -> submit
/// POST /{id}/approve            -> approve (admin)
/// POST /{id}/request-revision   -> request_revision (admin)
/// POST /{id}/complete           -> complete (admin)
/// POST /{id}/cancel             -> cancel (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(creator_projects::list).post(creator_projects::create),
        )
        .route(
            "/{id}",
            get(creator_projects::get_by_id).put(creator_projects::update),
        )
        .route("/{id}/submit", post(creator_projects::submit))
        .route("/{id}/approve", post(creator_projects::approve))
        .route(
            "/{id}/request-revision",
            post(creator_projects::request_revision),
        )
        .route("/{id}/complete", post(creator_projects::complete))
        .route("/{id}/cancel", post(creator_projects::cancel))
}
