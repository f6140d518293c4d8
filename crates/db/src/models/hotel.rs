//! Hotel entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staybook_core::types::{DbId, Timestamp};
use validator::Validate;

use super::room::Room;

/// A hotel row from the `hotels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hotel {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub phone_numbers: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A hotel with its rooms, as returned by the single-hotel endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HotelWithRooms {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
}

/// DTO for creating a new hotel.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHotel {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: String,
    #[validate(length(min = 1, message = "At least one phone number is required"))]
    pub phone_numbers: Vec<String>,
}

impl CreateHotel {
    /// Trim surrounding whitespace from text fields before validation.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.phone_numbers = normalize_phone_numbers(self.phone_numbers);
        self
    }
}

/// DTO for updating an existing hotel. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateHotel {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "At least one phone number is required"))]
    pub phone_numbers: Option<Vec<String>>,
}

impl UpdateHotel {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.address = self.address.map(|a| a.trim().to_string());
        self.phone_numbers = self.phone_numbers.map(normalize_phone_numbers);
        self
    }
}

/// Blank entries do not count as phone numbers.
fn normalize_phone_numbers(numbers: Vec<String>) -> Vec<String> {
    numbers
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}
