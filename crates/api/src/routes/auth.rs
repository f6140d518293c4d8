//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register      -> register
/// POST /login         -> login
/// GET  /logout        -> logout
/// GET  /me            -> me (requires auth)
/// GET  /users         -> list_users (admin)
/// PUT  /promote/{id}  -> promote (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/me", get(auth::me))
        .route("/users", get(auth::list_users))
        .route("/promote/{id}", put(auth::promote))
}
