//! Extractors whose rejections use the API error envelope.
//!
//! Drop-in replacements for axum's `Json`, `Path` and `Query`: a malformed
//! body, a non-numeric id or a bad query string reaches the client as
//! `{ "success": false, "error", "code" }` instead of plain text.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
