//! Persistence layer: row models, repository traits, and their PostgreSQL
//! (and, with the `memory` feature, in-process) implementations.

use sqlx::postgres::PgPoolOptions;

pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod models;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use repositories::Repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
