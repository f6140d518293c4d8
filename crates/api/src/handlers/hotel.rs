//! Handlers for the `/hotels` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use staybook_core::error::CoreError;
use staybook_core::types::DbId;
use staybook_db::models::hotel::{CreateHotel, Hotel, HotelWithRooms, UpdateHotel};
use staybook_db::models::hotel_query::{HotelQuery, Projection};
use staybook_db::repositories::{clamp_limit, clamp_page, page_offset};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, ListResponse, MessageResponse, Pagination};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Hotel", id })
}

/// GET /api/v1/hotels?page=&limit=&sort=&select=&{field}[{op}]=
///
/// `count` is the size of this page; `pagination` links are computed from
/// the number of hotels matching the filters.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> AppResult<Json<ListResponse<Value>>> {
    let query = HotelQuery::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let paging = PaginationParams::from_pairs(&params);
    let page = clamp_page(paging.page);
    let limit = clamp_limit(paging.limit);

    let total = state.repos.hotels.count(&query).await?;
    let hotels = state
        .repos
        .hotels
        .list(&query, limit, page_offset(page, limit))
        .await?;

    let data = hotels
        .iter()
        .map(|hotel| project(hotel, query.select.as_ref()))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(ListResponse::paginated(
        data,
        Pagination::for_page(page, limit, total),
    )))
}

/// GET /api/v1/hotels/{hotel_id}
///
/// The hotel with its rooms attached.
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<HotelWithRooms>>> {
    let hotel = state
        .repos
        .hotels
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let rooms = state.repos.rooms.list(Some(id)).await?;
    Ok(Json(DataResponse::new(HotelWithRooms { hotel, rooms })))
}

/// POST /api/v1/hotels
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateHotel>,
) -> AppResult<(StatusCode, Json<DataResponse<Hotel>>)> {
    let input = input.normalized();
    input.validate()?;

    let hotel = state.repos.hotels.create(&input).await?;
    tracing::info!(hotel_id = hotel.id, "Hotel created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(hotel))))
}

/// PUT /api/v1/hotels/{hotel_id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateHotel>,
) -> AppResult<Json<DataResponse<Hotel>>> {
    let input = input.normalized();
    input.validate()?;

    let hotel = state
        .repos
        .hotels
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(hotel)))
}

/// DELETE /api/v1/hotels/{hotel_id}
///
/// Removes the hotel's rooms and bookings with it.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.repos.hotels.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(hotel_id = id, deleted_by = admin.user_id, "Hotel deleted");
    Ok(Json(MessageResponse::new("Hotel deleted")))
}

/// 404 unless `id` names an existing hotel.
pub(crate) async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    match state.repos.hotels.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(not_found(id)),
    }
}

/// Serialize `hotel`, keeping only the fields `select` asks for.
fn project(hotel: &Hotel, select: Option<&Projection>) -> AppResult<Value> {
    let mut value = serde_json::to_value(hotel)
        .map_err(|e| AppError::InternalError(format!("Hotel serialization error: {e}")))?;
    if let (Some(select), Value::Object(fields)) = (select, &mut value) {
        for key in select.dropped_keys() {
            fields.remove(key);
        }
    }
    Ok(value)
}
