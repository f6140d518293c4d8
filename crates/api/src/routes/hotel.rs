//! Route definitions for the `/hotels` resource.
//!
//! Also nests the hotel-scoped booking and room listings under
//! `/hotels/{hotel_id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{booking, hotel, room};
use crate::state::AppState;

/// Routes mounted at `/hotels`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{hotel_id}              -> get_by_id
/// PUT    /{hotel_id}              -> update
/// DELETE /{hotel_id}              -> delete
///
/// GET    /{hotel_id}/bookings     -> booking::list_for_hotel
/// POST   /{hotel_id}/bookings     -> booking::create
/// GET    /{hotel_id}/rooms        -> room::list_for_hotel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(hotel::list).post(hotel::create))
        .route(
            "/{hotel_id}",
            get(hotel::get_by_id)
                .put(hotel::update)
                .delete(hotel::delete),
        )
        .route(
            "/{hotel_id}/bookings",
            get(booking::list_for_hotel).post(booking::create),
        )
        .route("/{hotel_id}/rooms", get(room::list_for_hotel))
}
