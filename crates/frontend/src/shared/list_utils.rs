//! Client-side search, sorting and paging for list pages
use std::cmp::Ordering;

/// Types that can be compared by a named column
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Types that can be matched against a free-text query
pub trait Searchable {
    /// `query` is already lowercased
    fn matches_query(&self, query: &str) -> bool;
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Keep items matching `query` (case-insensitive); blank query keeps all
pub fn filter_list<T: Searchable>(items: &mut Vec<T>, query: &str) {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return;
    }
    items.retain(|item| item.matches_query(&query));
}

/// One page of a list together with the paging totals
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page actually shown (clamped into range)
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> Default for Page<T> {
    /// Empty list: a single empty first page
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            total_pages: 1,
            total_count: 0,
        }
    }
}

/// Slice out page `page` (zero-based). Out-of-range pages clamp to the last one.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_count = items.len();
    let total_pages = if total_count == 0 {
        1
    } else {
        (total_count + page_size - 1) / page_size
    };
    let page = page.min(total_pages - 1);
    let start = page * page_size;
    let end = (start + page_size).min(total_count);

    Page {
        items: items.get(start..end).unwrap_or(&[]).to_vec(),
        page,
        total_pages,
        total_count,
    }
}

pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str, u32);

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "n" => self.1.cmp(&other.1),
                _ => self.0.cmp(other.0),
            }
        }
    }

    impl Searchable for Row {
        fn matches_query(&self, query: &str) -> bool {
            self.0.to_lowercase().contains(query)
        }
    }

    #[test]
    fn test_sort_both_directions() {
        let mut rows = vec![Row("b", 2), Row("a", 3), Row("c", 1)];
        sort_list(&mut rows, "name", true);
        assert_eq!(rows[0], Row("a", 3));
        sort_list(&mut rows, "n", false);
        assert_eq!(rows[0], Row("a", 3));
        assert_eq!(rows[2], Row("c", 1));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut rows = vec![Row("Admin", 1), Row("manager", 2), Row("user", 3)];
        filter_list(&mut rows, "  ADM ");
        assert_eq!(rows, vec![Row("Admin", 1)]);

        let mut rows = vec![Row("a", 1), Row("b", 2)];
        filter_list(&mut rows, "   ");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..7).collect();
        let page = paginate(&items, 1, 3);
        assert_eq!(page.items, vec![3, 4, 5]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 7);

        let last = paginate(&items, 10, 3);
        assert_eq!(last.page, 2);
        assert_eq!(last.items, vec![6]);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate::<u32>(&[], 3, 50);
        assert_eq!(page.page, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("email", "email", true), " ▲");
        assert_eq!(get_sort_indicator("email", "email", false), " ▼");
        assert_eq!(get_sort_indicator("email", "role", true), " ⇅");
    }

    #[test]
    fn test_default_page_matches_empty_paginate() {
        let empty: Vec<u32> = Vec::new();
        assert_eq!(Page::<u32>::default(), paginate(&empty, 0, 25));
    }
}
