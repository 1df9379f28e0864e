//! Route definitions for the `/welcome-calls` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::welcome_calls;
use crate::state::AppState;

/// Routes mounted at `/welcome-calls`.
///
/// ```text
/// GET    /availability                -> list_availability (admin)
/// POST   /availability                -> create_availability (admin)
/// DELETE /availability/{id}           -> delete_availability (admin)
/// GET    /slots                       -> slots (?host_user_id, from, to)
/// GET    /bookings                    -> list_bookings (?host_user_id, status)
/// POST   /bookings                    -> create_booking
/// GET    /bookings/{id}               -> get_booking
/// POST   /bookings/{id}/cancel        -> cancel_booking (admin)
/// POST   /bookings/{id}/complete      -> complete_booking (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/availability",
            get(welcome_calls::list_availability).post(welcome_calls::create_availability),
        )
        .route(
            "/availability/{id}",
            delete(welcome_calls::delete_availability),
        )
        .route("/slots", get(welcome_calls::slots))
        .route(
            "/bookings",
            get(welcome_calls::list_bookings).post(welcome_calls::create_booking),
        )
        .route("/bookings/{id}", get(welcome_calls::get_booking))
        .route("/bookings/{id}/cancel", post(welcome_calls::cancel_booking))
        .route(
            "/bookings/{id}/complete",
            post(welcome_calls::complete_booking),
        )
}
