//! Handlers for the `/rooms` resource and `/hotels/{hotel_id}/rooms`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use staybook_core::error::CoreError;
use staybook_core::types::DbId;
use staybook_db::models::room::{CreateRoom, Room, UpdateRoom};
use validator::Validate;

use super::hotel::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::RoomListParams;
use crate::response::{DataResponse, ListResponse, MessageResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Room", id })
}

/// GET /api/v1/rooms?hotel_id=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RoomListParams>,
) -> AppResult<Json<ListResponse<Room>>> {
    let rooms = state.repos.rooms.list(params.hotel_id).await?;
    Ok(Json(ListResponse::new(rooms)))
}

/// GET /api/v1/hotels/{hotel_id}/rooms
pub async fn list_for_hotel(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<DbId>,
) -> AppResult<Json<ListResponse<Room>>> {
    ensure_exists(&state, hotel_id).await?;
    let rooms = state.repos.rooms.list(Some(hotel_id)).await?;
    Ok(Json(ListResponse::new(rooms)))
}

/// GET /api/v1/rooms/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Room>>> {
    let room = state
        .repos
        .rooms
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(room)))
}

/// POST /api/v1/rooms
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateRoom>,
) -> AppResult<(StatusCode, Json<DataResponse<Room>>)> {
    input.validate()?;
    let room = state.repos.rooms.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(room))))
}

/// PUT /api/v1/rooms/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateRoom>,
) -> AppResult<Json<DataResponse<Room>>> {
    input.validate()?;
    let room = state
        .repos
        .rooms
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(room)))
}

/// DELETE /api/v1/rooms/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.repos.rooms.delete(id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new("Room deleted")))
}
