/// Shared types used across the codebase
use serde::{Deserialize, Serialize};

use crate::config::config;

/// 1-based page selection for the invoked tree level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i32,
    pub size: i32,
}

impl PageRequest {
    pub fn new(page: i32, size: i32) -> Self {
        Self { page, size }
    }

    /// Page size capped to `filter.max_limit`
    pub fn limit(&self) -> i32 {
        match config().filter.max_limit {
            Some(max) => self.size.min(max),
            None => self.size,
        }
    }

    pub fn offset(&self) -> i32 {
        (self.page - 1).saturating_mul(self.limit())
    }

    pub fn is_valid(&self) -> bool {
        self.page >= 1 && self.size >= 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, config().tree.default_page_size)
    }
}

/// Page envelope: the requested page of records plus the total under the same filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination<T> {
    pub page: i32,
    pub page_size: i32,
    pub records: Vec<T>,
    pub total: i64,
}

impl<T> Pagination<T> {
    pub fn new(request: PageRequest, records: Vec<T>, total: i64) -> Self {
        Self {
            page: request.page,
            page_size: request.limit(),
            records,
            total,
        }
    }
}
