//! Pagination for list queries.

use serde::Serialize;

/// A clamped pagination window.
///
/// `page` and `limit` are always positive. Raw query input that is missing
/// or does not parse as a positive integer falls back to the defaults
/// rather than failing the request or producing a nonsense offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: i64,
    limit: i64,
}

impl Page {
    /// Default page number.
    pub const DEFAULT_PAGE: i64 = 1;
    /// Default page size.
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Build a page window, substituting defaults for non-positive values.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page >= 1 { page } else { Self::DEFAULT_PAGE },
            limit: if limit >= 1 { limit } else { Self::DEFAULT_LIMIT },
        }
    }

    /// Parse a page window from raw query-string values.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            page.and_then(|v| v.trim().parse().ok())
                .unwrap_or(Self::DEFAULT_PAGE),
            limit
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(Self::DEFAULT_LIMIT),
        )
    }

    /// Page number (1-based).
    pub fn number(&self) -> i64 {
        self.page
    }

    /// Maximum number of records in the page.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of records preceding this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Page number that was fetched.
    pub page: i64,
    /// Requested page size.
    pub limit: i64,
    /// Total records matching the filter.
    pub total: i64,
    /// Total pages at this page size.
    pub pages: i64,
}

impl PageInfo {
    /// Compute pagination metadata for a total row count.
    pub fn new(page: &Page, total: i64) -> Self {
        Self {
            page: page.number(),
            limit: page.limit(),
            total,
            pages: (total as u64).div_ceil(page.limit() as u64) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Page::default();
        assert_eq!(page.number(), 1);
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_from_raw_parses_values() {
        let page = Page::from_raw(Some("3"), Some("25"));
        assert_eq!(page.number(), 3);
        assert_eq!(page.limit(), 25);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_from_raw_missing_values_fall_back() {
        assert_eq!(Page::from_raw(None, None), Page::default());
    }

    #[test]
    fn test_from_raw_non_numeric_falls_back() {
        assert_eq!(Page::from_raw(Some("abc"), Some("")), Page::default());
        assert_eq!(Page::from_raw(Some("1.5"), Some("ten")), Page::default());
    }

    #[test]
    fn test_from_raw_non_positive_falls_back() {
        assert_eq!(Page::from_raw(Some("0"), Some("-10")), Page::default());
    }

    #[test]
    fn test_page_info_rounds_up() {
        let page = Page::new(1, 100);
        assert_eq!(PageInfo::new(&page, 250).pages, 3);
        assert_eq!(PageInfo::new(&page, 300).pages, 3);
        assert_eq!(PageInfo::new(&page, 1).pages, 1);
        assert_eq!(PageInfo::new(&page, 0).pages, 0);
    }
}
