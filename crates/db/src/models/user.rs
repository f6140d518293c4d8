//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use staybook_core::access::Principal;
use staybook_core::roles::Role;
use staybook_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub telephone_number: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed role. An unrecognised stored value degrades to [`Role::Guest`].
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_else(|_| {
            tracing::warn!(user_id = self.id, role = %self.role, "Unknown role in users table");
            Role::Guest
        })
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role(),
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub telephone_number: Option<String>,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            telephone_number: user.telephone_number.clone(),
            email: user.email.clone(),
            role: user.role(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub telephone_number: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
