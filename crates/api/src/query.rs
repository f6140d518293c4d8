//! Shared query parameter types for API handlers.

use serde::Deserialize;
use staybook_core::types::DbId;

/// Page-based pagination parameters (`?page=&limit=`).
///
/// Values are clamped via `clamp_page` / `clamp_limit` from the
/// repository layer.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Pick `page` and `limit` out of raw query pairs. Unparseable values
    /// fall back to the defaults.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let lookup = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .and_then(|(_, value)| value.trim().parse().ok())
        };
        Self {
            page: lookup("page"),
            limit: lookup("limit"),
        }
    }
}

/// `?hotel_id=` filter on the flat room listing.
#[derive(Debug, Default, Deserialize)]
pub struct RoomListParams {
    pub hotel_id: Option<DbId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn pagination_from_pairs_ignores_other_params() {
        let params = PaginationParams::from_pairs(&pairs(&[
            ("name", "Ritz"),
            ("page", "3"),
            ("limit", "abc"),
        ]));
        assert_eq!(
            params,
            PaginationParams {
                page: Some(3),
                limit: None,
            }
        );
    }
}
