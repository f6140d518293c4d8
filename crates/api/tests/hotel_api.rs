//! Integration tests for the `/hotels` resource.

mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{
    body_json, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth, seed_hotel,
    seed_user, test_app,
};
use serde_json::json;
use staybook_core::roles::Role;
use staybook_db::models::booking::NewBooking;
use staybook_db::models::hotel_query::HotelQuery;
use staybook_db::models::room::CreateRoom;

fn hotel_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "address": "42 Ocean Drive",
        "phone_numbers": ["555-0100"],
    })
}

#[tokio::test]
async fn test_list_is_public_and_paginated() {
    let (app, repos) = test_app();
    for name in ["Alpha", "Bravo", "Charlie"] {
        seed_hotel(&repos, name).await;
    }

    let first = get(app.clone(), "/api/v1/hotels?limit=2").await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["name"], "Charlie");
    assert_eq!(json["pagination"]["next"], json!({ "page": 2, "limit": 2 }));
    assert!(json["pagination"].get("prev").is_none());

    let second = get(app, "/api/v1/hotels?page=2&limit=2").await;
    let json = body_json(second).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["name"], "Alpha");
    assert_eq!(json["pagination"]["prev"], json!({ "page": 1, "limit": 2 }));
    assert!(json["pagination"].get("next").is_none());
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let (app, repos) = test_app();
    seed_hotel(&repos, "Only").await;

    let response = get(app, "/api/v1/hotels?page=9223372036854775807&limit=100").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["data"], json!([]));
    assert!(json["pagination"].get("next").is_none());
    assert_eq!(json["pagination"]["prev"]["page"], 9_223_372_036_854_775_806_i64);
}

#[tokio::test]
async fn test_list_filters_sorts_and_selects() {
    let (app, repos) = test_app();
    for name in ["Alpha", "Bravo", "Charlie", "Delta"] {
        seed_hotel(&repos, name).await;
    }

    let response = get(
        app.clone(),
        "/api/v1/hotels?name%5Bgte%5D=Bravo&name%5Blt%5D=Delta&sort=name&select=name",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["name"], "Bravo");
    assert_eq!(json["data"][1]["name"], "Charlie");
    assert!(json["data"][0]["id"].is_i64());
    assert!(json["data"][0].get("address").is_none());

    let response = get(app, "/api/v1/hotels?name%5Bin%5D=Alpha,Delta&select=-address,-phone_numbers").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["name"], "Delta");
    assert!(json["data"][0].get("phone_numbers").is_none());
    assert!(json["data"][0]["created_at"].is_string());
}

#[tokio::test]
async fn test_list_rejects_unknown_fields() {
    let (app, _repos) = test_app();

    for uri in [
        "/api/v1/hotels?password_hash=x",
        "/api/v1/hotels?sort=secret",
        "/api/v1/hotels?name%5Bregex%5D=.*",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_get_by_id_includes_rooms() {
    let (app, repos) = test_app();
    let id = seed_hotel(&repos, "Roomy").await;
    repos
        .rooms
        .create(&CreateRoom {
            hotel_id: id,
            room_number: "101".to_string(),
            room_type: Some("double".to_string()),
            room_size: 20,
            price_per_night: 120.0,
        })
        .await
        .unwrap();

    let response = get(app, &format!("/api/v1/hotels/{id}")).await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Roomy");
    assert_eq!(json["data"]["rooms"][0]["room_number"], "101");
    assert_eq!(json["data"]["rooms"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_non_numeric_id_uses_error_envelope() {
    let (app, _repos) = test_app();

    let response = get(app, "/api/v1/hotels/not-a-number").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "MALFORMED_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_get_by_id() {
    let (app, repos) = test_app();
    let id = seed_hotel(&repos, "Grand").await;

    let found = get(app.clone(), &format!("/api/v1/hotels/{id}")).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(body_json(found).await["data"]["name"], "Grand");

    let missing = get(app, "/api/v1/hotels/9999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let json = body_json(missing).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Hotel with id 9999 not found");
}

#[tokio::test]
async fn test_create_requires_admin() {
    let (app, repos) = test_app();
    let (_user, user_token) = seed_user(&repos, "user@example.com", Role::User).await;

    let anonymous = post_json(app.clone(), "/api/v1/hotels", hotel_body("Nope")).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let as_user = post_json_auth(app, "/api/v1/hotels", hotel_body("Nope"), &user_token).await;
    assert_eq!(as_user.status(), StatusCode::FORBIDDEN);

    assert_eq!(repos.hotels.count(&HotelQuery::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_admin_creates_hotel_with_trimmed_name() {
    let (app, repos) = test_app();
    let (_admin, token) = seed_user(&repos, "admin@example.com", Role::Admin).await;

    let response =
        post_json_auth(app, "/api/v1/hotels", hotel_body("  Seaside Inn  "), &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Seaside Inn");
    assert_eq!(json["data"]["phone_numbers"], json!(["555-0100"]));
}

#[tokio::test]
async fn test_create_validates_fields() {
    let (app, repos) = test_app();
    let (_admin, token) = seed_user(&repos, "admin@example.com", Role::Admin).await;

    let long_name = "x".repeat(51);
    let response = post_json_auth(
        app.clone(),
        "/api/v1/hotels",
        hotel_body(&long_name),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Name must be between 1 and 50 characters");

    let no_phone = json!({ "name": "Quiet", "address": "1 Lane", "phone_numbers": [] });
    let response = post_json_auth(app, "/api/v1/hotels", no_phone, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_partial_update() {
    let (app, repos) = test_app();
    let (_admin, token) = seed_user(&repos, "admin@example.com", Role::Admin).await;
    let id = seed_hotel(&repos, "Old Name").await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/hotels/{id}"),
        json!({ "name": "New Name" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "New Name");
    assert_eq!(json["data"]["address"], "1 Test Street");
}

#[tokio::test]
async fn test_delete_cascades_to_bookings() {
    let (app, repos) = test_app();
    let (_admin, admin_token) = seed_user(&repos, "admin@example.com", Role::Admin).await;
    let (guest, guest_token) = seed_user(&repos, "guest@example.com", Role::User).await;
    let id = seed_hotel(&repos, "Doomed").await;
    let booking = repos
        .bookings
        .create(&NewBooking {
            user_id: guest.id,
            hotel_id: id,
            check_in: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            check_out: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        })
        .await
        .unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/hotels/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Hotel deleted");

    let gone = get_auth(
        app.clone(),
        &format!("/api/v1/bookings/{}", booking.id),
        &guest_token,
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let again = delete_auth(app, &format!("/api/v1/hotels/{id}"), &admin_token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
