//! Handlers for the `/auth` resource (register, login, session, promotion).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use staybook_core::error::CoreError;
use staybook_core::roles::Role;
use staybook_core::types::DbId;
use staybook_db::models::user::{CreateUser, User, UserResponse};
use validator::Validate;

use crate::auth::cookie::{cleared_cookie, session_cookie};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{DataResponse, ListResponse, MessageResponse, TokenResponse};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    pub telephone_number: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`. Both fields are required, but a
/// missing one is reported as a 400 rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account with the default role and sign it in.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterRequest>,
) -> AppResult<Response> {
    let input = RegisterRequest {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        telephone_number: input
            .telephone_number
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        password: input.password,
    };
    input.validate()?;
    validate_password_strength(&input.password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .repos
        .users
        .create(&CreateUser {
            name: input.name,
            telephone_number: input.telephone_number,
            email: input.email,
            password_hash,
            role: Role::default(),
        })
        .await?;
    tracing::info!(user_id = user.id, "User registered");

    token_response(&state, StatusCode::CREATED, &user)
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Response> {
    let (Some(email), Some(password)) = (
        input.email.filter(|e| !e.trim().is_empty()),
        input.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Please provide an email and password".into(),
        ));
    };

    let user = state
        .repos
        .users
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    token_response(&state, StatusCode::OK, &user)
}

/// GET /api/v1/auth/me
pub async fn me(RequireAuth(auth): RequireAuth) -> Json<DataResponse<UserResponse>> {
    Json(DataResponse::new(UserResponse::from(&auth.user)))
}

/// GET /api/v1/auth/logout
///
/// Overwrite the session cookie with a short-lived placeholder. Bearer
/// tokens stay valid until they expire.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, cleared_cookie(state.config.secure_cookies).to_string())],
        Json(MessageResponse::new("Logged out")),
    )
}

/// GET /api/v1/auth/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<UserResponse>>> {
    let users = state.repos.users.list().await?;
    Ok(Json(ListResponse::new(
        users.iter().map(UserResponse::from).collect(),
    )))
}

/// PUT /api/v1/auth/promote/{id}
///
/// Grant the admin role. Takes effect on the user's next request.
pub async fn promote(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state
        .repos
        .users
        .set_role(id, Role::Admin)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    tracing::info!(user_id = user.id, promoted_by = admin.user_id, "User promoted to admin");
    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a token for `user` and return it in the body and as the session cookie.
fn token_response(state: &AppState, status: StatusCode, user: &User) -> AppResult<Response> {
    let token = generate_access_token(user.id, user.role(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let cookie = session_cookie(
        &token,
        state.config.jwt.cookie_max_age_secs(),
        state.config.secure_cookies,
    )
    .to_string();

    let body = TokenResponse {
        success: true,
        token,
        data: UserResponse::from(user),
    };

    Ok((status, [(SET_COOKIE, cookie)], Json(body)).into_response())
}
