//! Page windowing over ordered result sets.
//!
//! A page window is the offset range `[start, end)` selected from an
//! already-ordered sequence for one page of results:
//!
//! ```text
//! start = (page - 1) * page_size
//! end   = start + page_size
//! ```
//!
//! Windows past the end of the sequence are empty, never an error.

use std::num::IntErrorKind;

use crate::DEFAULT_PAGE;

/// Offset range `[start, end)` for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// First offset on the page (inclusive).
    pub start: usize,
    /// Offset one past the last item on the page.
    pub end: usize,
}

impl PageWindow {
    /// Compute the window for a 1-based page number.
    ///
    /// Page `0` is treated as page `1`. Arithmetic saturates, so very large
    /// page numbers produce a window beyond any sequence.
    pub fn new(page: u32, page_size: usize) -> Self {
        let page = page.max(DEFAULT_PAGE) as usize;
        let start = (page - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size);
        Self { start, end }
    }

    /// Select this window from `items`, clamped to its length.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.start >= items.len() {
            return &[];
        }
        let end = self.end.min(items.len());
        &items[self.start..end]
    }
}

/// Return page `page` of `items`.
///
/// `items` must already be in the order pages should follow
/// (question listings are identifier ascending).
pub fn paginate<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    PageWindow::new(page, page_size).apply(items)
}

/// Parse a raw `page` query value.
///
/// Missing, non-integer, zero and negative values fall back to page 1.
/// Positive values too large for `u32` clamp to `u32::MAX`, which pages past
/// the end of any sequence.
pub fn parse_page(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_PAGE;
    };
    match raw.trim().parse::<u32>() {
        Ok(page) if page >= DEFAULT_PAGE => page,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
        _ => DEFAULT_PAGE,
    }
}
