//! Client-side pagination over a pre-sorted row set.

use std::ops::Range;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default page-size choices offered to the user.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Bounds of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: usize,
    /// Total number of pages (0 when there are no items).
    pub total_pages: usize,
    /// First item index (inclusive).
    pub start: usize,
    /// Last item index (exclusive).
    pub end: usize,
}

impl PageWindow {
    /// Item index range of the page.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of pages for `total_items`, 0 when there are none.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Compute the window of `current_page` over `total_items`.
///
/// Pages outside `[1, total_pages]` are rejected with `None`. With no items
/// at all, page 1 is the (empty) only page.
pub fn paginate(total_items: usize, page_size: usize, current_page: usize) -> Option<PageWindow> {
    if page_size == 0 || current_page == 0 {
        return None;
    }
    let pages = total_pages(total_items, page_size);
    if total_items == 0 {
        return (current_page == 1).then_some(PageWindow {
            page: 1,
            total_pages: 0,
            start: 0,
            end: 0,
        });
    }
    if current_page > pages {
        return None;
    }

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    Some(PageWindow {
        page: current_page,
        total_pages: pages,
        start,
        end,
    })
}

/// Pagination settings as declared by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    pub page_size: usize,
    pub current_page: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.current_page == 0 {
            return Err(ConfigError::ZeroCurrentPage);
        }
        if let Some(&bad) = self.page_size_options.iter().find(|&&size| size == 0) {
            return Err(ConfigError::InvalidPageSizeOption(bad));
        }
        Ok(())
    }
}

/// Pagination state of one table instance.
///
/// Invariant: when `total_items > 0`, `current_page` is within
/// `[1, total_pages]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    total_items: usize,
    page_size: usize,
    current_page: usize,
    page_size_options: Vec<usize>,
}

impl Pagination {
    /// Create pagination from validated settings.
    pub fn new(config: &PaginationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            total_items: 0,
            page_size: config.page_size,
            current_page: config.current_page,
            page_size_options: config.page_size_options.clone(),
        })
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// 1-based number of the first item shown, 0 when empty.
    pub fn start_item(&self) -> usize {
        if self.total_items == 0 {
            return 0;
        }
        (self.current_page - 1)
            .saturating_mul(self.page_size)
            .saturating_add(1)
            .min(self.total_items)
    }

    /// 1-based number of the last item shown.
    pub fn end_item(&self) -> usize {
        self.current_page
            .saturating_mul(self.page_size)
            .min(self.total_items)
    }

    /// Window of the current page.
    pub fn window(&self) -> PageWindow {
        paginate(self.total_items, self.page_size, self.current_page).unwrap_or(PageWindow {
            page: self.current_page,
            total_pages: self.total_pages(),
            start: 0,
            end: 0,
        })
    }

    /// The current page's slice of `rows`.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let window = self.window();
        rows.get(window.range()).unwrap_or(&[])
    }

    /// Update the item count.
    ///
    /// If the current page no longer exists, the view returns to page 1.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        if self.current_page > self.total_pages().max(1) {
            debug!(
                "Page {} out of range after resize to {} items, back to page 1",
                self.current_page, total_items
            );
            self.current_page = 1;
        }
    }

    /// Go to `page`.
    ///
    /// Pages outside `[1, total_pages]` are rejected: nothing changes and
    /// `None` is returned. Otherwise returns the new page.
    pub fn go_to(&mut self, page: usize) -> Option<usize> {
        if page < 1 || page > self.total_pages() {
            debug!(
                "Rejected page {} (total pages {})",
                page,
                self.total_pages()
            );
            return None;
        }
        self.current_page = page;
        Some(page)
    }

    pub fn first_page(&mut self) -> Option<usize> {
        self.go_to(1)
    }

    pub fn previous_page(&mut self) -> Option<usize> {
        self.go_to(self.current_page.checked_sub(1)?)
    }

    pub fn next_page(&mut self) -> Option<usize> {
        self.go_to(self.current_page.checked_add(1)?)
    }

    pub fn last_page(&mut self) -> Option<usize> {
        self.go_to(self.total_pages())
    }

    /// Change the page size and return to page 1.
    ///
    /// A zero size is rejected with `None`.
    pub fn set_page_size(&mut self, page_size: usize) -> Option<usize> {
        if page_size == 0 {
            debug!("Rejected page size 0");
            return None;
        }
        self.page_size = page_size;
        self.current_page = 1;
        Some(page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        let config = PaginationConfig::default();
        Self {
            total_items: 0,
            page_size: config.page_size,
            current_page: config.current_page,
            page_size_options: config.page_size_options,
        }
    }
}
