//! Domain logic for the Staybook hotel-booking backend.
//!
//! Everything in this crate is pure: no database, no HTTP. The API layer
//! feeds it identities and storage snapshots and maps its typed results
//! onto responses.

pub mod access;
pub mod booking;
pub mod error;
pub mod roles;
pub mod types;
