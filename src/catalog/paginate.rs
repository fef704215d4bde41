//! Fixed-size pagination and the visible page-number window

use serde::Serialize;

/// Posts per listing page
pub const PAGE_SIZE: usize = 10;

/// Maximum page numbers shown at once
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One page of a paginated list
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number
    pub number: usize,
    pub total_pages: usize,
}

/// Number of pages needed for `len` items
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Slice `items` into page `page` (1-based).
///
/// Page 0 is read as page 1. A page past the end is empty, not clamped.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page = page.max(1);

    let start = ((page - 1) * page_size).min(items.len());
    let end = (page * page_size).min(items.len());

    Page {
        items: &items[start..end],
        number: page,
        total_pages: total_pages(items.len(), page_size),
    }
}

/// Which page numbers a pagination control shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub current: usize,
    pub total: usize,
    /// First number of the centred window
    pub start: usize,
    /// Last number of the centred window
    pub end: usize,
    /// Show a standalone `1` before the window
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    /// Show a standalone `total` after the window
    pub show_last: bool,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Compute the window of at most [`MAX_VISIBLE_PAGES`] numbers around `current`.
///
/// Returns `None` when there is nothing to paginate (`total <= 1`).
pub fn page_window(current: usize, total: usize) -> Option<PageWindow> {
    if total <= 1 {
        return None;
    }

    let current = current.max(1);
    let half = MAX_VISIBLE_PAGES / 2;

    let mut start = current.saturating_sub(half).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
    if end + 1 < start + MAX_VISIBLE_PAGES {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }

    Some(PageWindow {
        current,
        total,
        start,
        end,
        show_first: start > 1,
        leading_ellipsis: start > 2,
        trailing_ellipsis: end + 1 < total,
        show_last: end < total,
        has_prev: current > 1,
        has_next: current < total,
    })
}
