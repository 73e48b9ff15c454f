//! Pagination controller.
//!
//! Tracks `page` (1-based), `page_size` and `total`, and keeps
//! `(page - 1) * page_size < total` true whenever `total > 0`. The controller
//! only describes the visible slice ([`offset`](PaginationController::offset),
//! [`limit`](PaginationController::limit)); the data source does the slicing.

use super::error::TableError;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationController {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl PaginationController {
    /// Creates a controller on page 1 with nothing loaded yet.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ZeroPageSize`] for a page size of zero.
    pub fn new(page_size: usize) -> Result<Self, TableError> {
        if page_size == 0 {
            return Err(TableError::ZeroPageSize);
        }
        Ok(Self {
            page: 1,
            page_size,
            total: 0,
        })
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Last valid page, `ceil(total / page_size)`, never below 1.
    #[must_use]
    pub const fn last_page(&self) -> usize {
        let pages = self.total.div_ceil(self.page_size);
        if pages == 0 {
            1
        } else {
            pages
        }
    }

    /// Moves to `page`, clamped into `1..=last_page`. Returns whether the page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let clamped = page.clamp(1, self.last_page());
        let changed = clamped != self.page;
        self.page = clamped;
        changed
    }

    /// Changes the page size and resets to page 1, whatever page was showing.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ZeroPageSize`] and leaves the state untouched for a
    /// page size of zero.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        if page_size == 0 {
            tracing::error!("rejected zero page size");
            return Err(TableError::ZeroPageSize);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Records the total reported by the data source, clamping the current page
    /// onto the last valid one. Returns whether the page moved, in which case
    /// the host must fetch again.
    pub fn set_total(&mut self, total: usize) -> bool {
        self.total = total;
        let last = self.last_page();
        if self.page > last {
            tracing::debug!(from = self.page, to = last, total, "clamping page to last valid page");
            self.page = last;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.has_next() && self.set_page(self.page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.has_previous() && self.set_page(self.page - 1)
    }

    /// Whether "Previous" is enabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether "Next" is enabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    /// Index of the first record of the current page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.page_size
    }
}
