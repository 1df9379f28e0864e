//! Route definitions for the `/platform` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tenants;
use crate::state::AppState;

/// Routes mounted at `/platform`.
///
/// All routes require the `super_admin` role (enforced by handler extractors).
///
/// ```text
/// GET  /tenants         -> list
/// POST /tenants         -> create
/// GET  /tenants/{slug}  -> get_by_slug
/// PUT  /tenants/{slug}  -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(tenants::list).post(tenants::create))
        .route(
            "/tenants/{slug}",
            get(tenants::get_by_slug).put(tenants::update),
        )
}
