//! Storage reachability check.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::DbPool;

#[async_trait]
pub trait HealthCheckRepository: Send + Sync {
    async fn check(&self) -> StoreResult<()>;
}

pub struct PgHealthCheckRepository {
    pool: DbPool,
}

impl PgHealthCheckRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheckRepository for PgHealthCheckRepository {
    async fn check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
