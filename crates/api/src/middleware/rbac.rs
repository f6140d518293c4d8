//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and runs the caller through
//! [`authorize`] with a fixed capability set, so the permitted roles of a
//! route are visible in the handler signature.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use staybook_core::access::{authorize, Capabilities};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    required: Capabilities,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    let principal = user.principal();
    let decision = authorize(Some(&principal), required);
    if !decision.is_allowed() {
        tracing::warn!(
            user_id = principal.id,
            role = %principal.role,
            required = ?required.roles(),
            "Access denied: role not permitted"
        );
    }
    decision.into_result(format!(
        "User role {} is not authorized to access this route",
        principal.role
    ))?;
    Ok(user)
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Capabilities::ADMIN_ONLY)
            .await
            .map(RequireAdmin)
    }
}

/// Requires `user` or `admin`. Guests are rejected with 403.
pub struct RequireMember(pub AuthUser);

impl FromRequestParts<AppState> for RequireMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Capabilities::MEMBERS)
            .await
            .map(RequireMember)
    }
}

/// Requires any authenticated user (any role).
///
/// Equivalent to [`AuthUser`], named for routes where "authentication
/// required" should read explicitly.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Capabilities::ANY_AUTHENTICATED)
            .await
            .map(RequireAuth)
    }
}
