//! Row models and DTOs.

pub mod booking;
pub mod hotel;
pub mod hotel_query;
pub mod room;
pub mod user;
