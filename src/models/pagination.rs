use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Keeps `skip` well inside the `i64` range MongoDB accepts.
pub const MAX_PAGE: u64 = 1_000_000;

/// Query parameters of a list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub search: Option<String>,
}

impl PageRequest {
    /// 1-based page number; `0` and absent both mean the first page.
    /// Larger values are capped at `MAX_PAGE`.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of documents to skip to reach the requested page.
    pub fn skip(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// 1-based row number of the `index`-th entry on `page`.
pub fn row_number(page: u64, limit: u64, index: u64) -> u64 {
    (page.max(1) - 1)
        .saturating_mul(limit)
        .saturating_add(index)
        .saturating_add(1)
}

/// The page to show after a deletion left `remaining_total` items.
///
/// Removing the last item of a page beyond the first moves back one page.
pub fn page_after_delete(page: u64, limit: u64, remaining_total: u64) -> u64 {
    let page = page.max(1);
    let pages = total_pages(remaining_total, limit);
    if page > 1 && page > pages {
        page - 1
    } else {
        page
    }
}
