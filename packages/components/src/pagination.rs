// ABOUTME: Pagination parameters and metadata for the component search endpoint
// ABOUTME: Out-of-range or unparsable values fall back to defaults instead of failing

use serde::{Deserialize, Serialize};

/// Default page size for component listings
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Maximum page size to prevent performance issues
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: if page >= MIN_PAGE { page } else { MIN_PAGE },
            page_size: if (1..=MAX_PAGE_SIZE).contains(&page_size) {
                page_size
            } else {
                DEFAULT_PAGE_SIZE
            },
        }
    }

    /// Parse raw query values; anything unusable becomes the default
    pub fn from_params(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(page_size))
    }

    /// SQL OFFSET for the current page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(MIN_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// Metadata about pagination state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_records: i64,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_records: i64) -> Self {
        Self {
            current_page: pagination.page,
            page_size: pagination.page_size,
            total_pages: (total_records + pagination.page_size - 1) / pagination.page_size,
            total_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let pagination = Pagination::from_params(None, None);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        assert_eq!(Pagination::from_params(Some("0"), Some("0")), Pagination::default());
        assert_eq!(Pagination::from_params(Some("-3"), Some("101")), Pagination::default());
        assert_eq!(Pagination::from_params(Some("abc"), Some("1.5")), Pagination::default());
    }

    #[test]
    fn test_offset_calculation() {
        let pagination = Pagination::from_params(Some("3"), Some("10"));
        assert_eq!(pagination.offset(), 20);

        let pagination = Pagination::from_params(Some(" 2 "), Some("100"));
        assert_eq!(pagination.page_size, 100);
        assert_eq!(pagination.offset(), 100);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let pagination = Pagination::new(1, 12);
        assert_eq!(PaginationMeta::new(&pagination, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(&pagination, 12).total_pages, 1);
        assert_eq!(PaginationMeta::new(&pagination, 13).total_pages, 2);
    }
}
