//! Fixed-size paging over an ordered list
//!
//! Pages are 1-based. An out-of-range page yields an empty slice; callers
//! that want clamping do it before calling [`paginate`].

use serde::Serialize;

/// One page of results plus navigation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    /// A page over nothing, used when a listing fails outright
    pub fn empty(page: usize) -> Self {
        paginate(Vec::new(), page, 1)
    }
}

/// Ceiling division; a zero page size counts as one
pub fn total_pages(total_items: usize, limit: usize) -> usize {
    total_items.div_ceil(limit.max(1))
}

/// Slice `items` into page `page` of size `limit`.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> Page<T> {
    let limit = limit.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, limit);

    let data = if page == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(limit);
        items.into_iter().skip(start).take(limit).collect()
    };

    Page {
        data,
        current_page: page,
        total_pages,
        total_items,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_pages_concatenate_to_full_set() {
        for n in [0usize, 1, 7, 12, 25] {
            for limit in [1usize, 3, 12] {
                let items: Vec<usize> = (0..n).collect();
                let pages = total_pages(n, limit);
                let mut joined = Vec::new();
                for page in 1..=pages {
                    joined.extend(paginate(items.clone(), page, limit).data);
                }
                assert_eq!(joined, items, "n={} limit={}", n, limit);
            }
        }
    }

    #[test]
    fn test_navigation_flags() {
        let items: Vec<u8> = (0..30).collect();

        let first = paginate(items.clone(), 1, 12);
        assert_eq!(first.data.len(), 12);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let last = paginate(items, 3, 12);
        assert_eq!(last.data, (24..30).collect::<Vec<u8>>());
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.total_items, 30);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items = vec!["a", "b", "c"];
        assert!(paginate(items.clone(), 0, 2).data.is_empty());

        let beyond = paginate(items, 9, 2);
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.current_page, 9);
        assert_eq!(beyond.total_pages, 2);
        assert!(!beyond.has_next_page);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(paginate(vec![1, 2, 3], 1, 2)).unwrap();
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["totalPages"], 2);
        assert_eq!(value["totalItems"], 3);
        assert_eq!(value["hasNextPage"], true);
        assert_eq!(value["hasPreviousPage"], false);
    }
}
