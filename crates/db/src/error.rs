//! Storage error type shared by every repository implementation.

/// Unique index on `users (email)`.
pub const UQ_USERS_EMAIL: &str = "uq_users_email";
/// Partial unique index on `bookings (user_id, hotel_id) WHERE deleted_at IS NULL`.
pub const UQ_BOOKINGS_ACTIVE_OWNER_HOTEL: &str = "uq_bookings_active_owner_hotel";
/// Unique index on `rooms (hotel_id, room_number)`.
pub const UQ_ROOMS_HOTEL_ROOM_NUMBER: &str = "uq_rooms_hotel_room_number";
pub const FK_ROOMS_HOTEL: &str = "fk_rooms_hotel";
pub const FK_BOOKINGS_HOTEL: &str = "fk_bookings_hotel";
pub const FK_BOOKINGS_USER: &str = "fk_bookings_user";
/// `bookings.check_out > bookings.check_in`.
pub const CHK_BOOKINGS_RANGE: &str = "chk_bookings_range";
/// `bookings.check_out - bookings.check_in <= 3 days`.
pub const CHK_BOOKINGS_MAX_STAY: &str = "chk_bookings_max_stay";

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `check_violation`.
const PG_CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn unique(constraint: &str) -> Self {
        StoreError::UniqueViolation {
            constraint: constraint.to_string(),
        }
    }

    pub fn foreign_key(constraint: &str) -> Self {
        StoreError::ForeignKeyViolation {
            constraint: constraint.to_string(),
        }
    }

    pub fn check(constraint: &str) -> Self {
        StoreError::CheckViolation {
            constraint: constraint.to_string(),
        }
    }

    /// `true` if this is a unique violation of the named constraint.
    pub fn violates(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::unique(constraint),
                Some(PG_FOREIGN_KEY_VIOLATION) => return StoreError::foreign_key(constraint),
                Some(PG_CHECK_VIOLATION) => return StoreError::check(constraint),
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn violates_matches_only_the_named_constraint() {
        let err = StoreError::unique(UQ_USERS_EMAIL);
        assert!(err.violates(UQ_USERS_EMAIL));
        assert!(!err.violates(UQ_BOOKINGS_ACTIVE_OWNER_HOTEL));
        assert!(!StoreError::foreign_key(UQ_USERS_EMAIL).violates(UQ_USERS_EMAIL));
    }

    #[test]
    fn row_not_found_stays_a_database_error() {
        assert_matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(sqlx::Error::RowNotFound)
        );
    }
}
