use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use staybook_core::booking::BookingRejection;
use staybook_core::error::CoreError;
use staybook_db::error::{
    CHK_BOOKINGS_MAX_STAY, CHK_BOOKINGS_RANGE, UQ_BOOKINGS_ACTIVE_OWNER_HOTEL, UQ_USERS_EMAIL,
};
use staybook_db::models::hotel_query::HotelQueryError;
use staybook_db::StoreError;
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for storage
/// failures, and implements [`IntoResponse`] to produce the
/// `{ "success": false, "error", "code" }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Field-level request validation failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The body, path or query string could not be extracted.
    #[error("Malformed request: {message}")]
    Malformed { status: StatusCode, message: String },

    #[error("Too many requests")]
    RateLimited,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<BookingRejection> for AppError {
    fn from(rejection: BookingRejection) -> Self {
        AppError::Core(CoreError::Booking(rejection))
    }
}

impl From<HotelQueryError> for AppError {
    fn from(err: HotelQueryError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

macro_rules! malformed_from {
    ($($rejection:ty),+) => {$(
        impl From<$rejection> for AppError {
            fn from(rejection: $rejection) -> Self {
                AppError::Malformed {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
            }
        }
    )+};
}

malformed_from!(JsonRejection, PathRejection, QueryRejection);

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = classify(&self);

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify(err: &AppError) -> (StatusCode, &'static str, String) {
    match err {
        AppError::Core(core) => match core {
            CoreError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            CoreError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            CoreError::Booking(rejection) => (
                StatusCode::BAD_REQUEST,
                rejection.code(),
                rejection.to_string(),
            ),
            CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            CoreError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal core error");
                internal()
            }
        },

        AppError::Store(store) => classify_store_error(store),

        AppError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            validation_message(errors),
        ),

        AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

        AppError::Malformed { status, message } => (*status, "MALFORMED_REQUEST", message.clone()),

        AppError::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            "Too many requests, please try again later".to_string(),
        ),

        AppError::InternalError(msg) => {
            tracing::error!(error = %msg, "Internal error");
            internal()
        }
    }
}

/// Map a storage error onto an HTTP status, error code, and message.
///
/// - The active-booking unique index reports exactly like the validator's
///   duplicate rejection, so a lost race is indistinguishable from a
///   sequential duplicate.
/// - Other unique violations map to 409.
/// - Foreign key violations mean the request named a missing parent: 400.
/// - The stay check constraints report like the matching validator
///   rejection. Other check violations are 400.
/// - Everything else is a sanitized 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::UniqueViolation { constraint } if constraint == UQ_BOOKINGS_ACTIVE_OWNER_HOTEL => {
            let rejection = BookingRejection::DuplicateBooking;
            (StatusCode::BAD_REQUEST, rejection.code(), rejection.to_string())
        }
        StoreError::UniqueViolation { constraint } if constraint == UQ_USERS_EMAIL => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Email is already registered".to_string(),
        ),
        StoreError::UniqueViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::ForeignKeyViolation { constraint } => (
            StatusCode::BAD_REQUEST,
            "INVALID_REFERENCE",
            format!("Referenced resource does not exist ({constraint})"),
        ),
        StoreError::CheckViolation { constraint } => {
            let rejection = match constraint.as_str() {
                CHK_BOOKINGS_MAX_STAY => Some(BookingRejection::StayTooLong),
                CHK_BOOKINGS_RANGE => Some(BookingRejection::InvalidRange),
                _ => None,
            };
            match rejection {
                Some(rejection) => {
                    (StatusCode::BAD_REQUEST, rejection.code(), rejection.to_string())
                }
                None => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                ),
            }
        }
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}

/// Flatten field errors into one sentence, ordered by field name.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();

    if messages.is_empty() {
        "Invalid request".to_string()
    } else {
        messages.join(", ")
    }
}
