//! Offset/limit pagination derived from a live total.

use std::num::NonZeroU64;

use shared::protocol::ListQuery;

/// Everything a view needs to render page controls. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: u64,
    pub total_pages: u64,
    pub offset: u64,
    pub items_per_page: u64,
    pub total_count: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageWindow {
    /// One page or less needs no controls.
    pub fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCoordinator {
    current_page: u64,
    items_per_page: NonZeroU64,
    total_count: u64,
}

impl PaginationCoordinator {
    pub fn new(items_per_page: NonZeroU64) -> Self {
        Self::with_initial_page(1, items_per_page)
    }

    pub fn with_initial_page(initial_page: u64, items_per_page: NonZeroU64) -> Self {
        Self {
            current_page: initial_page.max(1),
            items_per_page,
            total_count: 0,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u64 {
        self.items_per_page.get()
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.items_per_page.get())
    }

    /// Saturates at `u64::MAX` for pages too far out to address.
    pub fn offset(&self) -> u64 {
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page.get())
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            limit: self.items_per_page(),
            offset: self.offset(),
        }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            offset: self.offset(),
            items_per_page: self.items_per_page(),
            total_count: self.total_count,
            has_next_page: self.has_next_page(),
            has_previous_page: self.has_previous_page(),
        }
    }

    /// The current page is not clamped, even when it ends up past
    /// the last page.
    pub fn set_total_count(&mut self, total_count: u64) {
        self.total_count = total_count;
    }

    /// Moves to `page` if it lies in `1..=total_pages`. Returns whether the
    /// current page changed.
    pub fn set_current_page(&mut self, page: u64) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn go_to_first_page(&mut self) -> bool {
        self.set_current_page(1)
    }

    pub fn go_to_last_page(&mut self) -> bool {
        self.set_current_page(self.total_pages())
    }

    pub fn next_page(&mut self) -> bool {
        self.set_current_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_current_page(self.current_page.saturating_sub(1))
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
