//! Route definitions for the `/bookings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /       -> list
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(booking::list)).route(
        "/{id}",
        get(booking::get_by_id)
            .put(booking::update)
            .delete(booking::delete),
    )
}
