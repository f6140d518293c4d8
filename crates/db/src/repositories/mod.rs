//! Repository layer.
//!
//! Each repository is an object-safe async trait so handlers depend on the
//! storage interface, never on a concrete backend. [`Repositories`] bundles
//! one implementation of each and is what the API layer holds in its state.

use std::sync::Arc;

pub mod booking_repo;
pub mod health_repo;
pub mod hotel_repo;
pub mod room_repo;
pub mod user_repo;

pub use booking_repo::{BookingRepository, PgBookingRepository};
pub use health_repo::{HealthCheckRepository, PgHealthCheckRepository};
pub use hotel_repo::{HotelRepository, PgHotelRepository};
pub use room_repo::{PgRoomRepository, RoomRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use crate::DbPool;

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 25;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Clamp a requested 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset of a 1-based `page`. Saturates instead of overflowing, so an
/// absurd page number yields an empty page.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// One implementation of every repository, cheaply cloneable.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub health: Arc<dyn HealthCheckRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            hotels: Arc::new(PgHotelRepository::new(pool.clone())),
            rooms: Arc::new(PgRoomRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            health: Arc::new(PgHealthCheckRepository::new(pool)),
        }
    }

    /// Repositories backed by a single fresh [`crate::memory::MemoryStore`].
    #[cfg(feature = "memory")]
    pub fn in_memory() -> Self {
        let store = Arc::new(crate::memory::MemoryStore::default());
        Self {
            users: store.clone(),
            hotels: store.clone(),
            rooms: store.clone(),
            bookings: store.clone(),
            health: store,
        }
    }
}
