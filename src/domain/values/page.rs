use serde::Serialize;

/// One page of a filtered listing, with neighbouring offsets.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub next_offset: Option<usize>,
    pub prev_offset: Option<usize>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        let next_offset = (offset + limit < total).then_some(offset + limit);
        let prev_offset = (offset > 0).then(|| offset.saturating_sub(limit));
        Self {
            items,
            total,
            limit,
            offset,
            next_offset,
            prev_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_next_only() {
        let page = Page::new(vec![1, 2], 5, 2, 0);
        assert_eq!(page.next_offset, Some(2));
        assert_eq!(page.prev_offset, None);
    }

    #[test]
    fn test_last_page_has_prev_only() {
        let page = Page::new(vec![5], 5, 2, 4);
        assert_eq!(page.next_offset, None);
        assert_eq!(page.prev_offset, Some(2));
    }

    #[test]
    fn test_prev_offset_floors_at_zero() {
        let page: Page<u8> = Page::new(vec![], 10, 5, 3);
        assert_eq!(page.prev_offset, Some(0));
    }
}
