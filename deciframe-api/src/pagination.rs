//! Pagination of ranked results (100 results per page)
//!
//! Pages are 1-indexed. A page past the end of the results is an empty page,
//! never an error.

use crate::error::{Result, SearchError};

/// Page size constant for all result pages
pub const PAGE_SIZE: usize = 100;

/// Half-open index range `[start, end)` over a ranked result sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub end: usize,
}

impl Page {
    /// Compute the range covered by page `number` over `total` results
    ///
    /// # Examples
    /// ```
    /// use deciframe_api::pagination::Page;
    ///
    /// // 250 results: page 3 holds the last 50
    /// let p = Page::new(3, 250);
    /// assert_eq!((p.start, p.end), (200, 250));
    ///
    /// // Past the end: empty, not an error
    /// let p = Page::new(9, 250);
    /// assert!(p.is_empty());
    /// ```
    pub fn new(number: u32, total: usize) -> Self {
        let start = (number.max(1) as usize - 1).saturating_mul(PAGE_SIZE);
        let end = start.saturating_add(PAGE_SIZE).min(total).max(start);

        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Take this page out of `items`
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .get(self.start..self.end)
            .map(<[T]>::to_vec)
            .unwrap_or_default()
    }
}

/// Parse the requested page number
///
/// Absent or empty means page 1. Anything that is not an integer ≥ 1 is a
/// client error.
pub fn parse_page_number(raw: Option<&str>) -> Result<u32> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(1),
        Some(raw) => raw,
    };

    match raw.parse::<i64>() {
        Ok(page) if page >= 1 => u32::try_from(page)
            .map_err(|_| SearchError::BadRequest(format!("Page number too large: {}", raw))),
        Ok(page) => Err(SearchError::BadRequest(format!(
            "Page number must be positive: {}",
            page
        ))),
        Err(_) => Err(SearchError::BadRequest(format!("Invalid page number: {}", raw))),
    }
}
