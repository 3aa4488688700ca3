//! Page slicing for the route table

/// One page of an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    /// 1-based page number actually shown
    pub page: usize,
    pub page_count: usize,
}

/// Number of pages for `len` items, at least 1
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice `rows` into page `page` (1-based) of `page_size` rows.
/// The page is clamped to `[1, page_count]`.
pub fn paginate<T>(rows: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page_count = page_count(rows.len(), page_size);
    let page = page.clamp(1, page_count);

    let start = ((page - 1) * page_size).min(rows.len());
    let end = (start + page_size).min(rows.len());

    Page {
        rows: &rows[start..end],
        page,
        page_count,
    }
}

/// Page cursor that resets when the upstream row count changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    page: usize,
    disabled: bool,
    known_len: Option<usize>,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
            disabled: false,
            known_len: None,
        }
    }

    /// Show everything as a single page
    pub fn without_pagination() -> Self {
        Self {
            disabled: true,
            ..Self::new(1)
        }
    }

    /// Start from a row count the caller already rendered
    pub fn with_known_len(mut self, known_len: Option<usize>) -> Self {
        self.known_len = known_len;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Record the current upstream row count. Returns `true` if the count
    /// changed and the cursor went back to page 1.
    pub fn observe_len(&mut self, len: usize) -> bool {
        let changed = self.known_len.is_some_and(|known| known != len);
        self.known_len = Some(len);
        if changed {
            self.reset();
        }
        changed
    }

    /// Current page of `rows`. Clamps the stored page when pagination is on.
    pub fn slice<'a, T>(&mut self, rows: &'a [T]) -> Page<'a, T> {
        if self.disabled {
            return Page {
                rows,
                page: self.page,
                page_count: 1,
            };
        }

        let page = paginate(rows, self.page_size, self.page);
        self.page = page.page;
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_23_rows_page_size_10() {
        let rows: Vec<u32> = (0..23).collect();
        let page = paginate(&rows, 10, 3);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows, &[20, 21, 22]);
    }

    #[test]
    fn test_empty_has_one_page() {
        let rows: Vec<u32> = vec![];
        let page = paginate(&rows, 10, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_page_is_clamped() {
        let rows: Vec<u32> = (0..15).collect();
        assert_eq!(paginate(&rows, 10, 0).page, 1);
        let last = paginate(&rows, 10, 99);
        assert_eq!(last.page, 2);
        assert_eq!(last.rows.len(), 5);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let rows = [1, 2, 3];
        let page = paginate(&rows, 0, 2);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows, &[2]);
    }

    #[test]
    fn test_pages_concatenate_to_full_sequence() {
        for len in [0usize, 1, 9, 10, 11, 37] {
            let rows: Vec<usize> = (0..len).collect();
            for page_size in [1usize, 3, 10] {
                let count = page_count(len, page_size);
                let joined: Vec<usize> = (1..=count)
                    .flat_map(|p| paginate(&rows, page_size, p).rows.to_vec())
                    .collect();
                assert_eq!(joined, rows, "len {} size {}", len, page_size);
            }
        }
    }

    #[test]
    fn test_disabled_returns_everything_unclamped() {
        let rows: Vec<u32> = (0..42).collect();
        let mut paginator = Paginator::without_pagination();
        paginator.set_page(7);
        let page = paginator.slice(&rows);
        assert_eq!(page.rows.len(), 42);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 7);
    }

    #[test]
    fn test_observe_len_resets_on_change() {
        let mut paginator = Paginator::new(10);
        assert!(!paginator.observe_len(30));
        paginator.set_page(3);
        assert!(!paginator.observe_len(30));
        assert_eq!(paginator.page(), 3);

        assert!(paginator.observe_len(12));
        assert_eq!(paginator.page(), 1);
    }

    #[test]
    fn test_with_known_len_detects_filter_change() {
        let mut paginator = Paginator::new(5).with_known_len(Some(20));
        paginator.set_page(4);
        assert!(paginator.observe_len(8));
        let rows: Vec<u32> = (0..8).collect();
        let page = paginator.slice(&rows);
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 5);
    }

    #[test]
    fn test_slice_clamps_stored_page() {
        let rows: Vec<u32> = (0..12).collect();
        let mut paginator = Paginator::new(5);
        paginator.set_page(10);
        let page = paginator.slice(&rows);
        assert_eq!(page.page, 3);
        assert_eq!(paginator.page(), 3);
        assert_eq!(page.rows, &[10, 11]);
    }
}
