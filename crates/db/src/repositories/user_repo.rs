//! Repository for the `users` table.

use async_trait::async_trait;
use staybook_core::roles::Role;
use staybook_core::types::DbId;

use crate::error::StoreResult;
use crate::models::user::{CreateUser, User};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, telephone_number, email, password_hash, role, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation on `uq_users_email` if the email is taken.
    async fn create(&self, input: &CreateUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// List all users ordered by most recently created first.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Replace a user's role. Returns `None` if no such user exists.
    async fn set_role(&self, id: DbId, role: Role) -> StoreResult<Option<User>>;
}

pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: &CreateUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (name, telephone_number, email, password_hash, role)
             VALUES ($1, $2, LOWER($3), $4, $5)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.telephone_number)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn set_role(&self, id: DbId, role: Role) -> StoreResult<Option<User>> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
