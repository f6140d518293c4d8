//! Repository for the `bookings` table.
//!
//! Deletion is soft (`deleted_at`). Every read excludes deleted rows, and the
//! partial unique index `uq_bookings_active_owner_hotel` guarantees at most
//! one active booking per `(user_id, hotel_id)` even when two requests race
//! past the validator.

use async_trait::async_trait;
use staybook_core::types::DbId;

use crate::error::StoreResult;
use crate::models::booking::{
    Booking, BookingDetail, BookingDetailRow, BookingFilter, NewBooking, StayChange,
};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, hotel_id, check_in, check_out, created_at, updated_at, deleted_at";

/// Booking columns joined with the hotel and owner fields of [`BookingDetail`].
const DETAIL_SELECT: &str = "SELECT b.id, b.user_id, b.hotel_id, b.check_in, b.check_out, \
        b.created_at, b.updated_at, b.deleted_at, \
        h.name AS hotel_name, h.address AS hotel_address, \
        h.phone_numbers AS hotel_phone_numbers, \
        u.name AS user_name, u.email AS user_email \
     FROM bookings b \
     JOIN hotels h ON h.id = b.hotel_id \
     JOIN users u ON u.id = b.user_id";

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Active bookings of `user_id` at `hotel_id` (the duplicate-check snapshot).
    async fn find_active_by_owner_and_hotel(
        &self,
        user_id: DbId,
        hotel_id: DbId,
    ) -> StoreResult<Vec<Booking>>;

    /// Active bookings matching `filter`, earliest check-in first.
    async fn list(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>>;

    /// [`BookingRepository::list`] with the hotel and owner attached.
    async fn list_detailed(&self, filter: BookingFilter) -> StoreResult<Vec<BookingDetail>>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Booking>>;

    async fn find_detailed(&self, id: DbId) -> StoreResult<Option<BookingDetail>>;

    /// Insert a validated booking.
    ///
    /// Fails with a unique violation on `uq_bookings_active_owner_hotel` if the
    /// owner already holds an active booking at the hotel.
    async fn create(&self, input: &NewBooking) -> StoreResult<Booking>;

    /// Replace the stay dates. Returns `None` if no active booking has `id`.
    async fn update_stay(&self, id: DbId, change: &StayChange) -> StoreResult<Option<Booking>>;

    /// Soft-delete a booking. Returns `true` if an active row was marked deleted.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

pub struct PgBookingRepository {
    pool: DbPool,
}

impl PgBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_active_by_owner_and_hotel(
        &self,
        user_id: DbId,
        hotel_id: DbId,
    ) -> StoreResult<Vec<Booking>> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE user_id = $1 AND hotel_id = $2 AND deleted_at IS NULL"
        );
        let bookings = sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(hotel_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    async fn list(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE deleted_at IS NULL
               AND ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::BIGINT IS NULL OR hotel_id = $2)
             ORDER BY check_in, id"
        );
        let bookings = sqlx::query_as::<_, Booking>(&query)
            .bind(filter.user_id)
            .bind(filter.hotel_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    async fn list_detailed(&self, filter: BookingFilter) -> StoreResult<Vec<BookingDetail>> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE b.deleted_at IS NULL
               AND ($1::BIGINT IS NULL OR b.user_id = $1)
               AND ($2::BIGINT IS NULL OR b.hotel_id = $2)
             ORDER BY b.check_in, b.id"
        );
        let rows = sqlx::query_as::<_, BookingDetailRow>(&query)
            .bind(filter.user_id)
            .bind(filter.hotel_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookingDetail::from).collect())
    }

    async fn find_detailed(&self, id: DbId) -> StoreResult<Option<BookingDetail>> {
        let query = format!("{DETAIL_SELECT} WHERE b.id = $1 AND b.deleted_at IS NULL");
        let row = sqlx::query_as::<_, BookingDetailRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BookingDetail::from))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Booking>> {
        let query =
            format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 AND deleted_at IS NULL");
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn create(&self, input: &NewBooking) -> StoreResult<Booking> {
        let query = format!(
            "INSERT INTO bookings (user_id, hotel_id, check_in, check_out)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(input.user_id)
            .bind(input.hotel_id)
            .bind(input.check_in)
            .bind(input.check_out)
            .fetch_one(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn update_stay(&self, id: DbId, change: &StayChange) -> StoreResult<Option<Booking>> {
        let query = format!(
            "UPDATE bookings SET check_in = $2, check_out = $3
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(change.check_in)
            .bind(change.check_out)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
