//! Offset pagination primitives shared by every listing.

/// A validated 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

/// One page of results plus the metadata a UI needs to render pagers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total_count` items (at least 1).
    pub fn num_pages(&self) -> u64 {
        if self.total_count == 0 || self.page_size == 0 {
            return 1;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total_count: u64, page: u64) -> Page<()> {
        Page {
            items: Vec::new(),
            total_count,
            page,
            page_size: 20,
        }
    }

    #[test]
    fn num_pages_rounds_up() {
        assert_eq!(page(45, 1).num_pages(), 3);
        assert_eq!(page(40, 1).num_pages(), 2);
        assert_eq!(page(0, 1).num_pages(), 1);
    }

    #[test]
    fn next_and_previous() {
        assert!(page(45, 1).has_next());
        assert!(!page(45, 1).has_previous());
        assert!(!page(45, 3).has_next());
        assert!(page(45, 3).has_previous());
    }
}
