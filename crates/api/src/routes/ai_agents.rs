//! Route definitions for the `/ai-agents` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ai_agents;
use crate::state::AppState;

/// Routes mounted at `/ai-agents`.
///
/// ```text
/// GET  /                                   -> list
/// POST /                                   -> create (admin)
/// GET  /{id}                               -> get_by_id
/// PUT  /{id}                               -> update (admin)
/// POST /{id}/interactions                  -> record_interaction
/// GET  /{id}/relationships                 -> list_relationships
/// GET  /{id}/relationships/{relationship_id} -> get_relationship
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ai_agents::list).post(ai_agents::create))
        .route("/{id}", get(ai_agents::get_by_id).put(ai_agents::update))
        .route("/{id}/interactions", post(ai_agents::record_interaction))
        .route("/{id}/relationships", get(ai_agents::list_relationships))
        .route(
            "/{id}/relationships/{relationship_id}",
            get(ai_agents::get_relationship),
        )
}
