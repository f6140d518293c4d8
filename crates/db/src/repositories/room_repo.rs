//! Repository for the `rooms` table.

use async_trait::async_trait;
use staybook_core::types::DbId;

use crate::error::StoreResult;
use crate::models::room::{CreateRoom, Room, UpdateRoom};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, hotel_id, room_number, room_type, room_size, price_per_night, created_at, updated_at";

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, input: &CreateRoom) -> StoreResult<Room>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Room>>;

    /// List rooms, optionally only those of one hotel.
    async fn list(&self, hotel_id: Option<DbId>) -> StoreResult<Vec<Room>>;

    async fn update(&self, id: DbId, input: &UpdateRoom) -> StoreResult<Option<Room>>;

    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

pub struct PgRoomRepository {
    pool: DbPool,
}

impl PgRoomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn create(&self, input: &CreateRoom) -> StoreResult<Room> {
        let query = format!(
            "INSERT INTO rooms (hotel_id, room_number, room_type, room_size, price_per_night)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&query)
            .bind(input.hotel_id)
            .bind(&input.room_number)
            .bind(&input.room_type)
            .bind(input.room_size)
            .bind(input.price_per_night)
            .fetch_one(&self.pool)
            .await?;
        Ok(room)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Room>> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        let room = sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    async fn list(&self, hotel_id: Option<DbId>) -> StoreResult<Vec<Room>> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms
             WHERE ($1::BIGINT IS NULL OR hotel_id = $1)
             ORDER BY hotel_id, room_number"
        );
        let rooms = sqlx::query_as::<_, Room>(&query)
            .bind(hotel_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    async fn update(&self, id: DbId, input: &UpdateRoom) -> StoreResult<Option<Room>> {
        let query = format!(
            "UPDATE rooms SET
                room_number = COALESCE($2, room_number),
                room_type = COALESCE($3, room_type),
                room_size = COALESCE($4, room_size),
                price_per_night = COALESCE($5, price_per_night)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&input.room_number)
            .bind(&input.room_type)
            .bind(input.room_size)
            .bind(input.price_per_night)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
