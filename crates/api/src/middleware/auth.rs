//! Token-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use staybook_core::access::{Denial, Principal};
use staybook_core::roles::Role;
use staybook_core::types::DbId;
use staybook_db::models::user::User;

use crate::auth::cookie::resolve_token;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
///
/// The token only names the user; the row is reloaded on every request so a
/// promotion takes effect immediately and a removed user is turned away.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role as currently stored, not as issued in the token.
    pub role: Role,
    pub user: User,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id,
            role: self.role,
        }
    }
}

/// Reject as unauthenticated, logging why.
fn unauthenticated(reason: &'static str) -> AppError {
    tracing::warn!(reason, "Access denied: unauthenticated");
    AppError::Core(Denial::Unauthenticated.into_error(""))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = resolve_token(&parts.headers).ok_or_else(|| unauthenticated("missing token"))?;

        let claims = validate_token(&token, &state.config.jwt)
            .map_err(|_| unauthenticated("invalid or expired token"))?;

        let user = state
            .repos
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| unauthenticated("token subject no longer exists"))?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role(),
            user,
        })
    }
}
