//! Well-known roles.
//!
//! The string forms must match the `chk_users_role` constraint in
//! `20250301000001_create_users_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
pub const ROLE_GUEST: &str = "guest";

/// The closed set of roles a principal can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    /// Assigned to every self-registered account.
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => ROLE_GUEST,
            Role::User => ROLE_USER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_GUEST => Ok(Role::Guest),
            ROLE_USER => Ok(Role::User),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!("guest".parse::<Role>(), Ok(Role::Guest));
    }

    #[test]
    fn rejects_unknown_role() {
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UnknownRole("superuser".to_string()))
        );
    }

    #[test]
    fn display_matches_storage_form() {
        for role in [Role::Guest, Role::User, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn registration_default_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
