#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use staybook_api::auth::jwt::{generate_access_token, JwtConfig};
use staybook_api::config::ServerConfig;
use staybook_api::router::build_app_router;
use staybook_api::state::AppState;
use staybook_core::roles::Role;
use staybook_db::models::hotel::CreateHotel;
use staybook_db::models::user::{CreateUser, User};
use staybook_db::Repositories;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-not-for-production";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        password_min_length: 6,
        secure_cookies: false,
        database_max_connections: 1,
        // Requests in tests carry no client address and would share one bucket.
        rate_limit_max: 0,
        rate_limit_window_secs: 600,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiry_days: 30,
            cookie_expiry_days: 30,
        },
    }
}

/// Build the full application router over `repos`, with the production
/// middleware stack.
pub fn build_test_app(repos: Repositories) -> Router {
    build_app_with_config(repos, test_config())
}

/// Like [`build_test_app`], with a caller-supplied config.
pub fn build_app_with_config(repos: Repositories, config: ServerConfig) -> Router {
    let state = AppState {
        repos,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A fresh in-memory backend and a router over it.
pub fn test_app() -> (Router, Repositories) {
    let repos = Repositories::in_memory();
    (build_test_app(repos.clone()), repos)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a user directly and mint a token for it. The stored hash is not
/// a real password hash; use the register endpoint when a login is needed.
pub async fn seed_user(repos: &Repositories, email: &str, role: Role) -> (User, String) {
    let user = repos
        .users
        .create(&CreateUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            telephone_number: None,
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
        })
        .await
        .expect("user creation should succeed");
    let token = token_for(&user);
    (user, token)
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.role(), &test_config().jwt)
        .expect("token generation should succeed")
}

pub async fn seed_hotel(repos: &Repositories, name: &str) -> i64 {
    repos
        .hotels
        .create(&CreateHotel {
            name: name.to_string(),
            address: "1 Test Street".to_string(),
            phone_numbers: vec!["555-0100".to_string()],
        })
        .await
        .expect("hotel creation should succeed")
        .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Send `body` verbatim as `application/json`, for malformed payloads.
pub async fn send_raw_json(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: &'static str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
