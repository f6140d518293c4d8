//! Room entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staybook_core::types::{DbId, Timestamp};
use validator::Validate;

/// A room row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub hotel_id: DbId,
    pub room_number: String,
    pub room_type: Option<String>,
    /// Floor area in square metres.
    pub room_size: i32,
    pub price_per_night: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new room.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoom {
    pub hotel_id: DbId,
    #[validate(length(min = 1, message = "Please add a room number"))]
    pub room_number: String,
    pub room_type: Option<String>,
    #[validate(range(min = 1, message = "Room size must be positive"))]
    pub room_size: i32,
    #[validate(range(min = 0.0, message = "Price per night cannot be negative"))]
    pub price_per_night: f64,
}

/// DTO for updating an existing room. The owning hotel cannot change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoom {
    #[validate(length(min = 1, message = "Room number cannot be empty"))]
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    #[validate(range(min = 1, message = "Room size must be positive"))]
    pub room_size: Option<i32>,
    #[validate(range(min = 0.0, message = "Price per night cannot be negative"))]
    pub price_per_night: Option<f64>,
}
