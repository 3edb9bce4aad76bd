//! Pagination over the ordered result list

use super::error::{QueryError, Result};
use serde::Serialize;
use std::num::NonZeroUsize;

/// One page of a result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total pages, at least 1
    pub page_count: usize,
    /// Effective 1-indexed page after clamping
    pub page: usize,
}

/// `max(1, ceil(len / page_size))`
#[must_use]
pub const fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    let pages = len.div_ceil(page_size.get());
    if pages == 0 { 1 } else { pages }
}

/// Clamp a requested page into `[1, page_count]`
#[must_use]
pub fn clamp_page(requested: usize, page_count: usize) -> usize {
    requested.clamp(1, page_count.max(1))
}

/// Slice `ordered` into the requested page
#[must_use]
pub fn paginate<T: Clone>(ordered: &[T], page_size: NonZeroUsize, current_page: usize) -> Page<T> {
    let page_count = page_count(ordered.len(), page_size);
    let page = clamp_page(current_page, page_count);
    let start = ((page - 1) * page_size.get()).min(ordered.len());
    let end = (page * page_size.get()).min(ordered.len());
    Page {
        items: ordered[start..end].to_vec(),
        page_count,
        page,
    }
}

/// Page numbers shown as buttons around `current`
///
/// Starts at 1 until `current` passes the middle of the window, then keeps
/// `current` centred. Pages past `page_count` are dropped, so the window
/// shrinks near the end.
#[must_use]
pub fn page_window(current: usize, page_count: usize, width: usize) -> Vec<usize> {
    let slots = width.min(page_count);
    let half = width / 2;
    let start = if current <= half + 1 { 1 } else { current - half };
    (start..start + slots).filter(|page| *page <= page_count).collect()
}

/// Page size and current page for one listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_size: NonZeroUsize,
    current_page: usize,
}

impl PaginationState {
    #[must_use]
    pub const fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    /// Build from a raw size, rejecting zero
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidPageSize` when `page_size` is 0.
    pub fn with_size(page_size: usize) -> Result<Self> {
        NonZeroUsize::new(page_size)
            .map(Self::new)
            .ok_or(QueryError::InvalidPageSize(page_size))
    }

    #[must_use]
    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Move to `page`, clamped against the current result count
    pub fn set_page(&mut self, page: usize, result_count: usize) {
        self.current_page = clamp_page(page, page_count(result_count, self.page_size));
    }

    /// Back to page 1 (after any filter or sort change)
    pub const fn reset(&mut self) {
        self.current_page = 1;
    }

    #[must_use]
    pub fn page<T: Clone>(&self, ordered: &[T]) -> Page<T> {
        paginate(ordered, self.page_size, self.current_page)
    }
}
