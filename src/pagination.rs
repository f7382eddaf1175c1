//! Paging state for the weather table
//!
//! Pages are 1-based, like the page links shown to the user. The page-number
//! strip collapses long runs of pages into ellipses so it stays short.

use std::ops::Range;

/// Rows-per-page choices offered to the user
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Rows per page before the user picks another size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Show every page link up to this many pages
const MAX_VISIBLE_PAGES: usize = 5;

/// One entry in the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Current page and page size over `total` rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
    total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Starts on page 1. A zero page size falls back to the default.
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            total,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Replaces the row count and returns to page 1
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current_page = 1;
    }

    /// Jumps to `page`; out-of-range pages are ignored
    ///
    /// Returns whether the current page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.current_page.saturating_sub(1))
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages())
    }

    /// Changes the page size and returns to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            return;
        }
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Steps through [`PAGE_SIZES`], wrapping at either end
    pub fn cycle_page_size(&mut self, forward: bool) {
        let count = PAGE_SIZES.len();
        let next = match PAGE_SIZES.iter().position(|&s| s == self.page_size) {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            // Custom size: snap to the first preset above or below it
            None if forward => PAGE_SIZES
                .iter()
                .position(|&s| s > self.page_size)
                .unwrap_or(0),
            None => PAGE_SIZES
                .iter()
                .rposition(|&s| s < self.page_size)
                .unwrap_or(count - 1),
        };
        self.set_page_size(PAGE_SIZES[next]);
    }

    /// Row indices shown on the current page
    pub fn visible_range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Page links to display, with ellipses standing in for skipped pages
    ///
    /// Short tables list every page. Longer ones always show the first and
    /// last page plus the current page's neighbours, widened to three middle
    /// pages when the current page sits near either edge.
    pub fn page_numbers(&self) -> Vec<PageItem> {
        let total_pages = self.total_pages();

        if total_pages <= MAX_VISIBLE_PAGES {
            return (1..=total_pages).map(PageItem::Page).collect();
        }

        let current = self.current_page;
        let mut start = 2.max(current.saturating_sub(1));
        let mut end = (total_pages - 1).min(current + 1);

        if current <= 2 {
            end = 3;
        } else if current >= total_pages - 1 {
            start = total_pages - 2;
        }

        let mut items = vec![PageItem::Page(1)];
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
        items.extend((start..=end).map(PageItem::Page));
        if end < total_pages - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
        items
    }

    /// e.g. `Showing 11 to 20 of 45 entries`
    pub fn caption(&self) -> String {
        if self.total == 0 {
            return "No weather data to display".to_string();
        }
        let range = self.visible_range();
        format!(
            "Showing {} to {} of {} entries",
            range.start + 1,
            range.end,
            self.total
        )
    }
}
