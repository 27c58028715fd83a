//! Page slicing for local result lists and offset tracking for the live feed.

use serde::Serialize;
use std::num::NonZeroUsize;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based position of the first item on this page, 0 when empty.
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }
}

/// Number of pages needed for `total_items`. An empty list is one empty page.
pub fn total_pages(total_items: usize, page_size: NonZeroUsize) -> usize {
    total_items.div_ceil(page_size.get()).max(1)
}

/// Slice `items` into the requested 1-based page.
///
/// Out-of-range page numbers clamp to the nearest valid page: 0 becomes 1
/// and anything past the end becomes the last page.
pub fn paginate<T: Clone>(items: &[T], page_size: NonZeroUsize, page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = page.clamp(1, total_pages);
    let size = page_size.get();
    let start = (page - 1) * size;
    let end = (start + size).min(total_items);

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total_pages,
        total_items,
        page_size: size,
    }
}

// ── Live Feed Window ──────────────────────────────────────────

/// Position within a remote result set that is fetched one page at a time.
///
/// The feed rarely reports a usable total, so whether more results exist is
/// approximated from whether the last fetch came back full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedWindow {
    /// Offset of the first entry of the current page.
    pub start: usize,
    pub page_size: usize,
    /// Entries the last fetch returned.
    pub fetched: usize,
    /// Total reported by the feed, when it reported one.
    pub total_results: Option<usize>,
}

impl FeedWindow {
    /// A window that has not fetched anything yet.
    pub fn new(start: usize, page_size: NonZeroUsize) -> Self {
        Self {
            start,
            page_size: page_size.get(),
            fetched: 0,
            total_results: None,
        }
    }

    /// Record the outcome of a fetch.
    pub fn with_fetched(mut self, fetched: usize, total_results: Option<usize>) -> Self {
        self.fetched = fetched;
        self.total_results = total_results;
        self
    }

    pub fn has_more(&self) -> bool {
        match self.total_results {
            Some(total) => self.start + self.fetched < total,
            None => self.fetched == self.page_size,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    /// Offset of the next page, if there is one.
    pub fn next(&self) -> Option<usize> {
        self.has_more().then_some(self.start + self.page_size)
    }

    /// Offset of the previous page, if there is one.
    pub fn previous(&self) -> Option<usize> {
        self.has_previous()
            .then(|| self.start.saturating_sub(self.page_size))
    }

    /// 1-based page number of the current window.
    pub fn page_number(&self) -> usize {
        self.start / self.page_size.max(1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_twenty_three_items_in_pages_of_ten() {
        let items: Vec<usize> = (0..23).collect();
        let first = paginate(&items, size(10), 1);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items, (0..10).collect::<Vec<_>>());
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&items, size(10), 3);
        assert_eq!(last.items, vec![20, 21, 22]);
        assert_eq!(last.first_item_number(), 21);
        assert!(!last.has_next());
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let items: Vec<usize> = (0..23).collect();
        let clamped = paginate(&items, size(10), 99);
        assert_eq!(clamped.page, 3);
        assert_eq!(clamped.items.len(), 3);

        let zero = paginate(&items, size(10), 0);
        assert_eq!(zero.page, 1);
        assert_eq!(zero.items.len(), 10);
    }

    #[test]
    fn test_empty_list_is_one_empty_page() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, size(10), 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.first_item_number(), 0);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(total_pages(20, size(10)), 2);
        assert_eq!(total_pages(21, size(10)), 3);
        assert_eq!(total_pages(1, size(1)), 1);
    }

    #[test]
    fn test_feed_window_full_page_has_more() {
        let window = FeedWindow::new(0, size(25)).with_fetched(25, None);
        assert!(window.has_more());
        assert_eq!(window.next(), Some(25));
        assert_eq!(window.previous(), None);
        assert_eq!(window.page_number(), 1);
    }

    #[test]
    fn test_feed_window_short_page_is_last() {
        let window = FeedWindow::new(50, size(25)).with_fetched(7, None);
        assert!(!window.has_more());
        assert_eq!(window.next(), None);
        assert_eq!(window.previous(), Some(25));
        assert_eq!(window.page_number(), 3);
    }

    #[test]
    fn test_feed_window_prefers_reported_total() {
        let window = FeedWindow::new(25, size(25)).with_fetched(25, Some(50));
        assert!(!window.has_more());
        let window = FeedWindow::new(0, size(25)).with_fetched(10, Some(40));
        assert!(window.has_more());
    }
}
