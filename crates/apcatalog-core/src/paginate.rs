//! Pagination engine.
//!
//! Pages are 1-indexed. The slice function never clamps: an out-of-range
//! page yields an empty slice, and the session is responsible for resetting
//! the page when the result set shrinks.

use serde::{Deserialize, Serialize};

/// Page sizes offered by the table view.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Page size at session start.
pub const DEFAULT_PER_PAGE: usize = 25;

/// Returns the slice of `records` shown on `page`.
///
/// Page 0 is treated as page 1. A zero page size or an offset past the end
/// yields an empty slice.
#[must_use]
pub fn paginate<T>(records: &[T], page: usize, per_page: usize) -> &[T] {
    if per_page == 0 {
        return &[];
    }
    let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(records.len());
    &records[start..end]
}

/// Number of pages needed for `len` records; 0 when there are none.
#[must_use]
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

/// The "Showing `start` to `end` of `total`" window of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Current page (1-indexed).
    pub page: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// 1-based index of the first row shown (0 when nothing is shown).
    pub start: usize,
    /// 1-based index of the last row shown (0 when nothing is shown).
    pub end: usize,
    /// Number of matching records.
    pub total: usize,
}

impl PageWindow {
    /// Computes the window for `page` over `total` records.
    ///
    /// A page past the end shows nothing: `start` and `end` are both 0.
    #[must_use]
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(per_page);
        let (start, end) = if per_page == 0 || offset >= total {
            (0, 0)
        } else {
            (offset + 1, offset.saturating_add(per_page).min(total))
        };
        Self {
            page,
            per_page,
            total_pages: total_pages(total, per_page),
            start,
            end,
            total,
        }
    }

    /// Returns true if there is a page before this one.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Returns true if there is a page after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
