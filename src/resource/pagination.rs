use serde::{Deserialize, Serialize};

use crate::api::models::PageQuery;

/// Server-driven pagination cursor. `page_index` is 0-based; the backend
/// counts pages from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn with_index(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }

    /// Request parameters for this cursor: `{page: index + 1, limit: size}`
    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: Some(self.page_index.saturating_add(1)),
            limit: Some(self.page_size),
        }
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, row_count: u64) -> bool {
        (u64::from(self.page_index) + 1) * u64::from(self.page_size) < row_count
    }

    pub fn previous(&self) -> Option<Self> {
        self.can_previous().then(|| self.with_index(self.page_index - 1))
    }

    pub fn next(&self, row_count: u64) -> Option<Self> {
        self.can_next(row_count).then(|| self.with_index(self.page_index + 1))
    }

    /// At least one page, even for an empty collection
    pub fn page_count(&self, row_count: u64) -> u64 {
        let size = u64::from(self.page_size.max(1));
        ((row_count + size - 1) / size).max(1)
    }
}
