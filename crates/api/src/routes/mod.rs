pub mod auth;
pub mod booking;
pub mod health;
pub mod hotel;
pub mod room;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                           register (public)
/// /auth/login                              login (public)
/// /auth/logout                             clear session cookie (public)
/// /auth/me                                 current user (auth)
/// /auth/users                              list users (admin)
/// /auth/promote/{id}                       grant admin (admin)
///
/// /hotels                                  list (public), create (admin)
/// /hotels/{hotel_id}                       get (public), update, delete (admin)
/// /hotels/{hotel_id}/bookings              list (auth), create (user, admin)
/// /hotels/{hotel_id}/rooms                 list (auth)
///
/// /bookings                                list (auth; own unless admin)
/// /bookings/{id}                           get (auth), update, delete (user, admin); owner or admin
///
/// /rooms                                   list (auth), create (admin)
/// /rooms/{id}                              get (auth), update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/hotels", hotel::router())
        .nest("/bookings", booking::router())
        .nest("/rooms", room::router())
}
