//! Client-side pagination over small, already-filtered result sets.

use serde::{Deserialize, Serialize};

/// Rows per page used by the list screens.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// A 1-based page request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Build a request; page and page size are both coerced to at least 1.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results plus the bookkeeping a pager needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `all` according to `request`.
    ///
    /// Requests past the last page are clamped to the last page, so shrinking a
    /// result set (e.g. by typing into a search box) never yields an empty page
    /// while matches remain.
    pub fn paginate(all: Vec<T>, request: PageRequest) -> Self {
        let per_page = request.per_page.max(1);
        let total_items = all.len();
        let total_pages = total_items.div_ceil(per_page);
        let page = request.page.clamp(1, total_pages.max(1));
        let start = (page - 1) * per_page;

        let items = all.into_iter().skip(start).take(per_page).collect();

        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// 1-based index of the first row on this page ("showing X to Y of Z"), 0 if empty.
    pub fn start_index(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last row on this page, 0 if empty.
    pub fn end_index(&self) -> usize {
        (self.page * self.per_page).min(self.total_items)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginates_in_fixed_windows() {
        let page = Page::paginate((1..=12).collect::<Vec<_>>(), PageRequest::new(2, 5));
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.start_index(), 6);
        assert_eq!(page.end_index(), 10);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn last_page_may_be_short() {
        let page = Page::paginate((1..=12).collect::<Vec<_>>(), PageRequest::new(3, 5));
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.end_index(), 12);
        assert!(!page.has_next());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let page = Page::paginate(vec!['a', 'b'], PageRequest::new(9, 5));
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec!['a', 'b']);
    }

    #[test]
    fn empty_input_yields_empty_page() {
        let page: Page<u8> = Page::paginate(Vec::new(), PageRequest::first());
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.start_index(), 0);
        assert_eq!(page.end_index(), 0);
        assert!(!page.has_next());
    }
}
