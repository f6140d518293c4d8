//! The `token` session cookie.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

/// Name of the session cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Placeholder value written on logout.
pub const CLEARED_TOKEN: &str = "none";

/// Lifetime of the placeholder cookie written on logout.
pub const CLEARED_MAX_AGE_SECS: i64 = 10;

/// The session cookie storing `token` for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// The cookie that overwrites the session on logout.
pub fn cleared_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(CLEARED_TOKEN, CLEARED_MAX_AGE_SECS, secure)
}

/// Find the `token` value in a `Cookie` header, skipping the logout
/// placeholder. Malformed pairs are ignored.
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .flatten()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim().to_owned())
        .filter(|value| !value.is_empty() && value != CLEARED_TOKEN)
}

/// Resolve the caller's token: a `Bearer` authorization header wins over
/// the cookie.
pub fn resolve_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(token_from_cookie_header)
}
