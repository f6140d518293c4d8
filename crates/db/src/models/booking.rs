//! Booking entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use staybook_core::access::Owned;
use staybook_core::booking::BookingSnapshot;
use staybook_core::types::{DbId, Timestamp};

/// A booking row from the `bookings` table.
///
/// A booking is active while `deleted_at` is `NULL`; repositories only
/// ever hand out active bookings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub hotel_id: DbId,
    pub check_in: Timestamp,
    pub check_out: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
}

impl Booking {
    pub fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            id: self.id,
            owner_id: self.user_id,
            hotel_id: self.hotel_id,
        }
    }
}

impl Owned for Booking {
    fn owner_id(&self) -> DbId {
        self.user_id
    }
}

/// The hotel fields embedded in a booking listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HotelSummary {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub phone_numbers: Vec<String>,
}

/// The user fields embedded in a booking listing for admins.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// A booking with its hotel and owner attached.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub hotel: HotelSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl BookingDetail {
    /// Drop the owner, for callers who may only see the hotel.
    pub fn without_user(self) -> Self {
        Self { user: None, ..self }
    }
}

impl Owned for BookingDetail {
    fn owner_id(&self) -> DbId {
        self.booking.user_id
    }
}

/// Flat join row behind [`BookingDetail`].
#[derive(Debug, FromRow)]
pub(crate) struct BookingDetailRow {
    pub id: DbId,
    pub user_id: DbId,
    pub hotel_id: DbId,
    pub check_in: Timestamp,
    pub check_out: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub hotel_name: String,
    pub hotel_address: String,
    pub hotel_phone_numbers: Vec<String>,
    pub user_name: String,
    pub user_email: String,
}

impl From<BookingDetailRow> for BookingDetail {
    fn from(row: BookingDetailRow) -> Self {
        Self {
            hotel: HotelSummary {
                id: row.hotel_id,
                name: row.hotel_name,
                address: row.hotel_address,
                phone_numbers: row.hotel_phone_numbers,
            },
            user: Some(UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            }),
            booking: Booking {
                id: row.id,
                user_id: row.user_id,
                hotel_id: row.hotel_id,
                check_in: row.check_in,
                check_out: row.check_out,
                created_at: row.created_at,
                updated_at: row.updated_at,
                deleted_at: row.deleted_at,
            },
        }
    }
}

/// A validated booking ready to insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: DbId,
    pub hotel_id: DbId,
    pub check_in: Timestamp,
    pub check_out: Timestamp,
}

/// Validated replacement dates for an existing booking.
#[derive(Debug, Clone, Copy)]
pub struct StayChange {
    pub check_in: Timestamp,
    pub check_out: Timestamp,
}

/// Narrows a booking listing. `None` fields do not filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub user_id: Option<DbId>,
    pub hotel_id: Option<DbId>,
}
