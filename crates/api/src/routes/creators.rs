//! Route definitions for the `/creators` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::creators;
use crate::state::AppState;

/// Routes mounted at `/creators`.
///
/// ```text
/// GET    /       -> list (?status, limit, offset)
/// POST   /       -> create (admin)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update (admin)
/// DELETE /{id}   -> delete (admin, soft delete)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(creators::list).post(creators::create))
        .route(
            "/{id}",
            get(creators::get_by_id)
                .put(creators::update)
                .delete(creators::delete),
        )
}
