//! Page-number pagination envelope shared by the API and the frontend
//!
//! `page` is 1-based. The envelope carries the total, the 1-based
//! index range of the rows on this page and relative links to the
//! neighbouring pages.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Row limit for non-paginated result lists (autocomplete)
pub const RESULT_LIMIT: usize = 10;

/// Страница результатов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub page_size: u64,
    pub page: u64,
    pub first_index: u64,
    pub last_index: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(window: &PageWindow, results: Vec<T>, path: &str, query: Option<&str>) -> Self {
        Self {
            total: window.total,
            page_size: window.page_size,
            page: window.page,
            first_index: window.first_index(),
            last_index: window.last_index(),
            next: window
                .has_next()
                .then(|| page_link(path, query, Some(window.page + 1))),
            previous: window.has_previous().then(|| {
                // link to the first page drops the page parameter
                let prev = window.page - 1;
                page_link(path, query, (prev > 1).then_some(prev))
            }),
            results,
        }
    }
}

/// Result list capped at [`RESULT_LIMIT`] rows, without page links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitedResults<T> {
    pub total: u64,
    pub first_index: u64,
    pub last_index: u64,
    pub results: Vec<T>,
}

impl<T> LimitedResults<T> {
    pub fn new(mut results: Vec<T>) -> Self {
        results.truncate(RESULT_LIMIT);
        let count = results.len() as u64;
        Self {
            total: count,
            first_index: 1,
            last_index: count,
            results,
        }
    }
}

/// Requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`; `page` must be a positive integer.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self, String> {
        let page = match page.map(str::trim).filter(|s| !s.is_empty()) {
            None => 1,
            Some("last") => u64::MAX,
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(format!("Invalid page: {}", raw)),
            },
        };
        let page_size = match page_size.map(str::trim).filter(|s| !s.is_empty()) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("Invalid page_size: {}", raw))?
                .clamp(1, MAX_PAGE_SIZE),
        };
        Ok(Self { page, page_size })
    }

    /// Resolve against the row count. An empty first page is allowed.
    pub fn window(&self, total: u64) -> Result<PageWindow, String> {
        let num_pages = if total == 0 {
            1
        } else {
            total.div_ceil(self.page_size)
        };
        let page = if self.page == u64::MAX { num_pages } else { self.page };
        if page > num_pages {
            return Err(format!("Invalid page: {} (of {})", page, num_pages));
        }
        Ok(PageWindow {
            page,
            page_size: self.page_size,
            total,
            num_pages,
        })
    }
}

/// Resolved page position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub num_pages: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    pub fn first_index(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    pub fn last_index(&self) -> u64 {
        if self.page == self.num_pages {
            self.total
        } else {
            self.page * self.page_size
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// `path?query` with the `page` parameter replaced (or removed when `page` is None)
pub fn page_link(path: &str, query: Option<&str>, page: Option<u64>) -> String {
    let mut pairs: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|p| !p.is_empty() && *p != "page" && !p.starts_with("page="))
        .map(str::to_string)
        .collect();
    if let Some(page) = page {
        pairs.push(format!("page={}", page));
    }
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_parse() {
        assert_eq!(PageRequest::parse(None, None), Ok(PageRequest::default()));
        assert_eq!(
            PageRequest::parse(Some("3"), Some("500")),
            Ok(PageRequest {
                page: 3,
                page_size: MAX_PAGE_SIZE,
            })
        );
        assert!(PageRequest::parse(Some("0"), None).is_err());
        assert!(PageRequest::parse(Some("x"), None).is_err());
        assert!(PageRequest::parse(None, Some("-1")).is_err());
    }

    #[test]
    fn test_window_indexes() {
        let req = PageRequest { page: 2, page_size: 10 };
        let window = req.window(25).unwrap();
        assert_eq!(window.num_pages, 3);
        assert_eq!(window.offset(), 10);
        assert_eq!(window.first_index(), 11);
        assert_eq!(window.last_index(), 20);
        assert!(window.has_next());
        assert!(window.has_previous());

        let last = PageRequest { page: 3, page_size: 10 }.window(25).unwrap();
        assert_eq!(last.first_index(), 21);
        assert_eq!(last.last_index(), 25);
        assert!(!last.has_next());
    }

    #[test]
    fn test_window_empty_and_out_of_range() {
        let empty = PageRequest::default().window(0).unwrap();
        assert_eq!(empty.first_index(), 0);
        assert_eq!(empty.last_index(), 0);
        assert!(!empty.has_next());
        assert!(PageRequest { page: 2, page_size: 10 }.window(0).is_err());
        assert!(PageRequest { page: 4, page_size: 10 }.window(25).is_err());
    }

    #[test]
    fn test_last_page_keyword() {
        let req = PageRequest::parse(Some("last"), Some("10")).unwrap();
        assert_eq!(req.window(25).unwrap().page, 3);
    }

    #[test]
    fn test_page_links() {
        let path = "/api/v2/search/credential/topic";
        let window = PageRequest { page: 2, page_size: 10 }.window(35).unwrap();
        let page = Page::new(&window, vec![1, 2, 3], path, Some("topic_id=5&page=2&revoked="));
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v2/search/credential/topic?topic_id=5&revoked=&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v2/search/credential/topic?topic_id=5&revoked=")
        );
        assert_eq!(page.first_index, 11);
        assert_eq!(page.last_index, 20);
    }

    #[test]
    fn test_page_link_without_query() {
        assert_eq!(page_link("/x", None, None), "/x");
        assert_eq!(page_link("/x", Some("page=4"), Some(5)), "/x?page=5");
    }

    #[test]
    fn test_limited_results() {
        let limited = LimitedResults::new((0..25).collect::<Vec<i32>>());
        assert_eq!(limited.total, 10);
        assert_eq!(limited.first_index, 1);
        assert_eq!(limited.last_index, 10);
        assert_eq!(limited.results.len(), RESULT_LIMIT);
    }
}
