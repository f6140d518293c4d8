//! Authentication and authorization extractors, and request rate limiting.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer token or the `token` cookie.
//! - [`rbac::RequireAuth`] -- Any authenticated role.
//! - [`rbac::RequireMember`] -- `user` or `admin`.
//! - [`rbac::RequireAdmin`] -- `admin` only.
//!
//! [`rate_limit`] holds the per-client request limiter layered over every route.

pub mod auth;
pub mod rate_limit;
pub mod rbac;
