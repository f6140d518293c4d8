//! Shared response envelope types for API handlers.
//!
//! Every success body carries `"success": true`. Use these types instead of
//! ad-hoc `serde_json::json!` so the envelope stays consistent.

use serde::Serialize;
use staybook_db::models::user::UserResponse;

/// `{ "success": true, "data": T }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "count": n, "pagination"?: {...}, "data": [...] }`
///
/// `count` is the number of items in this response, not the total.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination: None,
            data,
        }
    }

    pub fn paginated(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::new(data)
        }
    }
}

/// Links to the neighbouring pages, present only when they exist.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Neighbour links for a 1-based `page` of `limit` items out of `total`.
    pub fn for_page(page: i64, limit: i64, total: i64) -> Self {
        let start = page.saturating_sub(1).saturating_mul(limit);
        let end = page.saturating_mul(limit);
        Self {
            next: (end < total).then(|| PageRef {
                page: page.saturating_add(1),
                limit,
            }),
            prev: (start > 0).then_some(PageRef {
                page: page - 1,
                limit,
            }),
        }
    }
}

/// `{ "success": true, "message": "..." }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Body of a successful register or login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub data: UserResponse,
}
