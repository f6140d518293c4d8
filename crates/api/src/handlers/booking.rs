//! Handlers for bookings: `/hotels/{hotel_id}/bookings` and `/bookings`.
//!
//! Every mutation passes the role gate (extractor), then the ownership
//! guard, then the booking validator, and only then reaches storage.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use staybook_core::access::{authorize_resource, Owned};
use staybook_core::booking::{validate, BookingDraft, ValidationMode};
use staybook_core::error::CoreError;
use staybook_core::types::DbId;
use staybook_db::models::booking::{
    Booking, BookingDetail, BookingFilter, NewBooking, StayChange,
};

use super::hotel::ensure_exists;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireMember};
use crate::response::{DataResponse, ListResponse, MessageResponse};
use crate::state::AppState;

/// Request body for creating or changing a booking.
///
/// Dates stay raw text; the validator owns parsing. On update an absent
/// field keeps the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct BookingRequest {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Booking",
        id,
    })
}

/// Apply the ownership guard to `booking` for `action`.
fn ensure_owner<B: Owned>(auth: &AuthUser, id: DbId, booking: &B, action: &str) -> AppResult<()> {
    let decision = authorize_resource(&auth.principal(), booking);
    if !decision.is_allowed() {
        tracing::warn!(
            user_id = auth.user_id,
            booking_id = id,
            owner_id = booking.owner_id(),
            action,
            "Access denied: not the booking owner"
        );
    }
    decision.into_result(format!(
        "User {} is not authorized to {action} this booking",
        auth.user_id
    ))?;
    Ok(())
}

/// Load an active booking and apply the ownership guard for `action`.
async fn load_owned(state: &AppState, auth: &AuthUser, id: DbId, action: &str) -> AppResult<Booking> {
    let booking = state
        .repos
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_owner(auth, id, &booking, action)?;
    Ok(booking)
}

/// Admins see every booking; everyone else sees their own.
fn visible_to(auth: &AuthUser, hotel_id: Option<DbId>) -> BookingFilter {
    BookingFilter {
        user_id: (!auth.role.is_admin()).then_some(auth.user_id),
        hotel_id,
    }
}

/// Attach the owner only for admins; everyone else sees the hotel alone.
fn shaped_for(auth: &AuthUser, detail: BookingDetail) -> BookingDetail {
    if auth.role.is_admin() {
        detail
    } else {
        detail.without_user()
    }
}

/// GET /api/v1/bookings
pub async fn list(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<BookingDetail>>> {
    let bookings = state
        .repos
        .bookings
        .list_detailed(visible_to(&auth, None))
        .await?;
    Ok(Json(ListResponse::new(
        bookings.into_iter().map(|b| shaped_for(&auth, b)).collect(),
    )))
}

/// GET /api/v1/hotels/{hotel_id}/bookings
pub async fn list_for_hotel(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<DbId>,
) -> AppResult<Json<ListResponse<BookingDetail>>> {
    ensure_exists(&state, hotel_id).await?;
    let bookings = state
        .repos
        .bookings
        .list_detailed(visible_to(&auth, Some(hotel_id)))
        .await?;
    Ok(Json(ListResponse::new(
        bookings.into_iter().map(|b| shaped_for(&auth, b)).collect(),
    )))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<BookingDetail>>> {
    let detail = state
        .repos
        .bookings
        .find_detailed(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_owner(&auth, id, &detail, "view")?;
    Ok(Json(DataResponse::new(shaped_for(&auth, detail))))
}

/// POST /api/v1/hotels/{hotel_id}/bookings
///
/// The caller always books for themself. Two concurrent requests can both
/// pass validation; the storage unique index then rejects the loser, which
/// surfaces as the same duplicate-booking error.
pub async fn create(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<DbId>,
    ApiJson(input): ApiJson<BookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    ensure_exists(&state, hotel_id).await?;

    let existing: Vec<_> = state
        .repos
        .bookings
        .find_active_by_owner_and_hotel(auth.user_id, hotel_id)
        .await?
        .iter()
        .map(Booking::snapshot)
        .collect();

    let draft = BookingDraft {
        owner_id: auth.user_id,
        hotel_id,
        check_in: input.check_in.as_deref(),
        check_out: input.check_out.as_deref(),
    };
    let stay = validate(&draft, &existing, ValidationMode::Create).inspect_err(|rejection| {
        tracing::debug!(user_id = auth.user_id, hotel_id, code = rejection.code(), "Booking rejected");
    })?;

    let booking = state
        .repos
        .bookings
        .create(&NewBooking {
            user_id: auth.user_id,
            hotel_id,
            check_in: stay.check_in,
            check_out: stay.check_out,
        })
        .await?;
    tracing::info!(
        booking_id = booking.id,
        user_id = booking.user_id,
        hotel_id,
        days = stay.days,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(booking))))
}

/// PUT /api/v1/bookings/{id}
///
/// Re-validates the merged dates against a fresh snapshot that leaves out
/// the booking itself. The duplicate rule is not re-applied: owner and
/// hotel cannot change, so an update never creates a second booking for
/// the pair.
pub async fn update(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<BookingRequest>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = load_owned(&state, &auth, id, "update").await?;

    if input.check_in.is_none() && input.check_out.is_none() {
        return Ok(Json(DataResponse::new(booking)));
    }

    let stored_check_in = booking.check_in.to_rfc3339();
    let stored_check_out = booking.check_out.to_rfc3339();
    let draft = BookingDraft {
        owner_id: booking.user_id,
        hotel_id: booking.hotel_id,
        check_in: Some(input.check_in.as_deref().unwrap_or(&stored_check_in)),
        check_out: Some(input.check_out.as_deref().unwrap_or(&stored_check_out)),
    };
    let others: Vec<_> = state
        .repos
        .bookings
        .find_active_by_owner_and_hotel(booking.user_id, booking.hotel_id)
        .await?
        .iter()
        .filter(|b| b.id != id)
        .map(Booking::snapshot)
        .collect();
    let stay = validate(&draft, &others, ValidationMode::Update)?;

    let updated = state
        .repos
        .bookings
        .update_stay(
            id,
            &StayChange {
                check_in: stay.check_in,
                check_out: stay.check_out,
            },
        )
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /api/v1/bookings/{id}
pub async fn delete(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    load_owned(&state, &auth, id, "delete").await?;

    if !state.repos.bookings.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(booking_id = id, deleted_by = auth.user_id, "Booking deleted");
    Ok(Json(MessageResponse::new("Booking deleted")))
}
