use axum::routing::post;
use axum::Router;

use crate::handlers::shipping;
use crate::state::AppState;

/// Routes mounted at `/shipping`. Public.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/delivery-customization",
        post(shipping::delivery_customization),
    )
}
