//! Route-level role gate and resource ownership guard.
//!
//! [`authorize`] answers "may this role reach this endpoint at all";
//! [`authorize_owner`] answers "does this principal own this resource".
//! Both are pure decisions returned as values. Logging a denial is the
//! caller's business.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// An authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: DbId,
    pub role: Role,
}

/// The roles permitted to invoke an operation.
///
/// An empty set means any authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities(&'static [Role]);

impl Capabilities {
    pub const ANY_AUTHENTICATED: Capabilities = Capabilities(&[]);
    pub const MEMBERS: Capabilities = Capabilities(&[Role::Admin, Role::User]);
    pub const ADMIN_ONLY: Capabilities = Capabilities(&[Role::Admin]);

    pub const fn new(roles: &'static [Role]) -> Self {
        Capabilities(roles)
    }

    pub fn permits(&self, role: Role) -> bool {
        self.0.is_empty() || self.0.contains(&role)
    }

    pub fn roles(&self) -> &'static [Role] {
        self.0
    }
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    Unauthenticated,
    Forbidden,
}

impl Denial {
    /// The error to surface for this denial. `message` is used only for
    /// [`Denial::Forbidden`]; unauthenticated callers get a fixed message.
    pub fn into_error(self, message: impl Into<String>) -> CoreError {
        match self {
            Denial::Unauthenticated => {
                CoreError::Unauthorized("Not authorized to access this route".into())
            }
            Denial::Forbidden => CoreError::Forbidden(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert into a `Result`, attaching `message` to a forbidden denial.
    pub fn into_result(self, message: impl Into<String>) -> Result<(), CoreError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial.into_error(message)),
        }
    }
}

/// Decide whether `principal` may invoke an operation gated by `required`.
pub fn authorize(principal: Option<&Principal>, required: Capabilities) -> Decision {
    let Some(principal) = principal else {
        return Decision::Deny(Denial::Unauthenticated);
    };
    if required.permits(principal.role) {
        Decision::Allow
    } else {
        Decision::Deny(Denial::Forbidden)
    }
}

/// Resources that belong to a single principal.
pub trait Owned {
    fn owner_id(&self) -> DbId;
}

/// Allow the owner of a resource, or any admin.
pub fn authorize_owner(requester: &Principal, owner_id: DbId) -> Decision {
    if requester.id == owner_id || requester.role.is_admin() {
        Decision::Allow
    } else {
        Decision::Deny(Denial::Forbidden)
    }
}

/// [`authorize_owner`] for anything implementing [`Owned`].
pub fn authorize_resource<R: Owned + ?Sized>(requester: &Principal, resource: &R) -> Decision {
    authorize_owner(requester, resource.owner_id())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn principal(id: DbId, role: Role) -> Principal {
        Principal { id, role }
    }

    struct Thing {
        owner: DbId,
    }

    impl Owned for Thing {
        fn owner_id(&self) -> DbId {
            self.owner
        }
    }

    #[test]
    fn absent_principal_is_unauthenticated() {
        assert_eq!(
            authorize(None, Capabilities::ADMIN_ONLY),
            Decision::Deny(Denial::Unauthenticated)
        );
        assert_eq!(
            authorize(None, Capabilities::ANY_AUTHENTICATED),
            Decision::Deny(Denial::Unauthenticated)
        );
    }

    #[test]
    fn user_cannot_reach_admin_route() {
        let user = principal(1, Role::User);
        assert_eq!(
            authorize(Some(&user), Capabilities::ADMIN_ONLY),
            Decision::Deny(Denial::Forbidden)
        );
    }

    #[test]
    fn admin_reaches_admin_route() {
        let admin = principal(1, Role::Admin);
        assert_eq!(
            authorize(Some(&admin), Capabilities::ADMIN_ONLY),
            Decision::Allow
        );
    }

    #[test]
    fn empty_set_admits_every_role() {
        for role in [Role::Guest, Role::User, Role::Admin] {
            let p = principal(7, role);
            assert!(authorize(Some(&p), Capabilities::ANY_AUTHENTICATED).is_allowed());
        }
    }

    #[test]
    fn guest_is_not_a_member() {
        let guest = principal(3, Role::Guest);
        assert_eq!(
            authorize(Some(&guest), Capabilities::MEMBERS),
            Decision::Deny(Denial::Forbidden)
        );
        let user = principal(4, Role::User);
        assert!(authorize(Some(&user), Capabilities::MEMBERS).is_allowed());
    }

    #[test]
    fn owner_may_mutate_own_resource() {
        let owner = principal(10, Role::User);
        assert_eq!(authorize_owner(&owner, 10), Decision::Allow);
    }

    #[test]
    fn non_owner_is_forbidden() {
        let other = principal(11, Role::User);
        assert_eq!(
            authorize_owner(&other, 10),
            Decision::Deny(Denial::Forbidden)
        );
    }

    #[test]
    fn admin_may_mutate_any_resource() {
        let admin = principal(99, Role::Admin);
        assert_eq!(authorize_resource(&admin, &Thing { owner: 10 }), Decision::Allow);
    }

    #[test]
    fn decisions_map_to_core_errors() {
        assert!(Decision::Allow.into_result("nope").is_ok());
        assert_matches!(
            Decision::Deny(Denial::Unauthenticated).into_result("nope"),
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            Decision::Deny(Denial::Forbidden).into_result("nope"),
            Err(CoreError::Forbidden(msg)) if msg == "nope"
        );
    }
}
