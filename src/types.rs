/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

use crate::config;

/// `?page=&limit=` as sent by clients. Missing or zero values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Resolve against the configured default limit
    pub fn resolve(&self) -> Pagination {
        self.resolve_with_default(config::config().api.default_page_limit)
    }

    pub fn resolve_with_default(&self, default_limit: u32) -> Pagination {
        Pagination::new(self.page, self.limit, default_limit, config::config().api.max_page_limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit.filter(|l| *l > 0).unwrap_or(default_limit).min(max_limit.max(1));
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }
}

/// Paginated list payload: `{data, total, page, limit, total_page}`
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_page: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let limit = pagination.limit.max(1) as i64;
        Self {
            data,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_page: (total + limit - 1) / limit,
        }
    }

    pub fn empty(pagination: Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        let p = Pagination::new(None, None, 20, 100);
        assert_eq!(p, Pagination { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(Some(0), Some(0), 20, 100);
        assert_eq!(p, Pagination { page: 1, limit: 20 });

        let p = Pagination::new(Some(3), Some(500), 20, 100);
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 200);
    }

    #[test]
    fn total_page_rounds_up() {
        let p = Pagination::new(Some(1), Some(20), 20, 100);
        assert_eq!(Page::<u8>::new(vec![], 0, p).total_page, 0);
        assert_eq!(Page::<u8>::new(vec![], 20, p).total_page, 1);
        assert_eq!(Page::<u8>::new(vec![], 21, p).total_page, 2);
    }
}
