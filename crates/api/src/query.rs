//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Hard cap applied to any `limit` query parameter.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size when `limit` is omitted.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to `[1, MAX_PAGE_SIZE]` / non-negative offset.
    pub fn clamp(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let params = PaginationParams {
            limit: None,
            offset: None,
        };
        assert_eq!(params.clamp(), (DEFAULT_PAGE_SIZE, 0));
    }

    #[test]
    fn clamps_oversized_limit() {
        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.clamp(), (MAX_PAGE_SIZE, 0));
    }

    #[test]
    fn clamps_zero_limit_to_one() {
        let params = PaginationParams {
            limit: Some(0),
            offset: Some(40),
        };
        assert_eq!(params.clamp(), (1, 40));
    }
}
