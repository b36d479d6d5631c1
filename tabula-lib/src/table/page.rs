//! Page state and pagination descriptor

use std::ops::Range;

/// Current page and page size of one table instance.
///
/// Invariant: `1 <= current_page <= total_pages(row_count)` after every call
/// that receives the row count. Out-of-range pages are clamped down, never
/// reset to the first page.
///
/// # Example
///
/// ```
/// use tabula_lib::table::PageState;
///
/// let mut page = PageState::new(10);
/// page.go_to(5, 47);
/// assert_eq!(page.current_page(), 5);
///
/// // Enlarging the page size keeps the operator as close as possible.
/// page.set_page_size(25, 47);
/// assert_eq!(page.current_page(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
}

impl PageState {
    /// Creates a state on page 1. A zero page size is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Returns the one-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns `max(1, ceil(row_count / page_size))`.
    pub fn total_pages(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size).max(1)
    }

    /// Clamps the current page into range after the data changed.
    pub fn clamp(&mut self, row_count: usize) {
        let total = self.total_pages(row_count);
        self.current_page = self.current_page.clamp(1, total);
    }

    /// Changes the page size and clamps the current page down if needed.
    pub fn set_page_size(&mut self, page_size: usize, row_count: usize) {
        self.page_size = page_size.max(1);
        self.clamp(row_count);
    }

    /// Moves to a page, clamped into range.
    pub fn go_to(&mut self, page: usize, row_count: usize) {
        self.current_page = page;
        self.clamp(row_count);
    }

    /// Returns the slice bounds of the current page.
    pub fn range(&self, row_count: usize) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(row_count);
        let end = start.saturating_add(self.page_size).min(row_count);
        start..end
    }

    /// Describes the current page for the pagination controls.
    pub fn descriptor(&self, row_count: usize) -> PaginationDescriptor {
        let total_pages = self.total_pages(row_count);
        let current_page = self.current_page.clamp(1, total_pages);
        let range = PageState {
            current_page,
            page_size: self.page_size,
        }
        .range(row_count);

        PaginationDescriptor {
            current_page,
            page_size: self.page_size,
            total_pages,
            total_rows: row_count,
            first_row: if range.is_empty() { 0 } else { range.start + 1 },
            last_row: range.end,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(10)
    }
}

/// What the pagination controls under a table display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDescriptor {
    /// One-based current page.
    pub current_page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Number of pages, at least one.
    pub total_pages: usize,
    /// Rows across all pages.
    pub total_rows: usize,
    /// One-based index of the first visible row, 0 when there are none.
    pub first_row: usize,
    /// One-based index of the last visible row, 0 when there are none.
    pub last_row: usize,
    /// Whether a previous page exists.
    pub has_previous: bool,
    /// Whether a next page exists.
    pub has_next: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_formula() {
        for size in 1..=7usize {
            let page = PageState::new(size);
            for n in 0..=40usize {
                let expected = std::cmp::max(1, n.div_ceil(size));
                assert_eq!(page.total_pages(n), expected, "n={n} size={size}");
            }
        }
    }

    #[test]
    fn test_page_size_change_keeps_page_in_bounds() {
        for n in 0..=60usize {
            for start in 1..=12usize {
                for size in 1..=30usize {
                    let mut page = PageState::new(5);
                    page.go_to(start, n);
                    let before = page.current_page();
                    page.set_page_size(size, n);
                    let after = page.current_page();
                    assert!(after >= 1 && after <= page.total_pages(n));
                    assert!(after <= before.max(1));
                }
            }
        }
    }

    #[test]
    fn test_clamp_down_not_reset() {
        let mut page = PageState::new(10);
        page.go_to(4, 40);
        page.set_page_size(20, 40);
        assert_eq!(page.current_page(), 2);
    }

    #[test]
    fn test_zero_page_size_raised() {
        let mut page = PageState::new(0);
        assert_eq!(page.page_size(), 1);
        page.set_page_size(0, 3);
        assert_eq!(page.page_size(), 1);
    }

    #[test]
    fn test_range_and_descriptor() {
        let mut page = PageState::new(10);
        page.go_to(3, 25);
        assert_eq!(page.range(25), 20..25);

        let d = page.descriptor(25);
        assert_eq!(d.total_pages, 3);
        assert_eq!((d.first_row, d.last_row), (21, 25));
        assert!(d.has_previous);
        assert!(!d.has_next);
    }

    #[test]
    fn test_descriptor_empty() {
        let d = PageState::new(10).descriptor(0);
        assert_eq!(d.total_pages, 1);
        assert_eq!((d.first_row, d.last_row), (0, 0));
        assert!(!d.has_previous && !d.has_next);
    }
}
