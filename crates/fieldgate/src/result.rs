//! Paged search results.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One page of matching items plus the metadata to page through the rest.
///
/// A result is read-only once built. [`total_count`](Self::total_count)
/// counts every item matching the filters, not just this page. The derived fields ([`total_pages`](Self::total_pages),
/// [`has_previous_page`](Self::has_previous_page),
/// [`has_next_page`](Self::has_next_page)) are computed on demand and
/// included when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<I> {
    items: Vec<I>,
    total_count: usize,
    page_number: usize,
    page_size: usize,
}

impl<I> SearchResult<I> {
    /// Creates a result for one page.
    ///
    /// Used by the pipeline and by backends that page on their own.
    pub fn new(items: Vec<I>, total_count: usize, page_number: usize, page_size: usize) -> Self {
        SearchResult {
            items,
            total_count,
            page_number,
            page_size,
        }
    }

    /// The items on this page.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Consumes the result, returning the items on this page.
    pub fn into_items(self) -> Vec<I> {
        self.items
    }

    /// Number of items matching the filters, across all pages.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// The 1-based page number that was requested.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// The requested page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total_count` items; 0 when nothing matched.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    /// Returns `true` if this is not the first page.
    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    /// Returns `true` if a later page exists.
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }

    /// Returns `true` if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts every item, keeping the pagination metadata.
    pub fn map<U, F>(self, f: F) -> SearchResult<U>
    where
        F: FnMut(I) -> U,
    {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

impl<I: Clone> SearchResult<&I> {
    /// Clones borrowed items into an owned result.
    pub fn cloned(self) -> SearchResult<I> {
        self.map(I::clone)
    }
}

impl<I: Serialize> Serialize for SearchResult<I> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SearchResult", 7)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("totalCount", &self.total_count)?;
        state.serialize_field("pageNumber", &self.page_number)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.serialize_field("totalPages", &self.total_pages())?;
        state.serialize_field("hasPreviousPage", &self.has_previous_page())?;
        state.serialize_field("hasNextPage", &self.has_next_page())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(total_count: usize, page_number: usize, page_size: usize) -> SearchResult<u32> {
        SearchResult::new(Vec::new(), total_count, page_number, page_size)
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(result(10, 1, 3).total_pages(), 4);
        assert_eq!(result(9, 1, 3).total_pages(), 3);
        assert_eq!(result(0, 1, 3).total_pages(), 0);
    }

    #[test]
    fn page_flags() {
        let first = result(10, 1, 3);
        assert!(!first.has_previous_page());
        assert!(first.has_next_page());

        let last = result(10, 4, 3);
        assert!(last.has_previous_page());
        assert!(!last.has_next_page());

        let beyond = result(10, 9, 3);
        assert!(beyond.has_previous_page());
        assert!(!beyond.has_next_page());

        let nothing = result(0, 1, 10);
        assert!(!nothing.has_previous_page());
        assert!(!nothing.has_next_page());
    }

    #[test]
    fn map_keeps_metadata() {
        let mapped = SearchResult::new(vec![1u32, 2], 5, 2, 2).map(|n| n.to_string());
        assert_eq!(mapped.items(), ["1", "2"]);
        assert_eq!(mapped.total_count(), 5);
        assert_eq!(mapped.page_number(), 2);
        assert_eq!(mapped.page_size(), 2);
    }

    #[test]
    fn cloned_owns_items() {
        let source = vec![String::from("a")];
        let borrowed = SearchResult::new(source.iter().collect(), 1, 1, 10);
        let owned: SearchResult<String> = borrowed.cloned();
        assert_eq!(owned.into_items(), source);
    }

    #[test]
    fn deserializes_wire_shape() {
        let page: SearchResult<u32> = serde_json::from_value(json!({
            "items": [1, 2],
            "totalCount": 7,
            "pageNumber": 1,
            "pageSize": 2,
            "hasNextPage": true
        }))
        .unwrap();
        assert_eq!(page, SearchResult::new(vec![1, 2], 7, 1, 2));
        assert_eq!(page.total_pages(), 4);
    }

    #[test]
    fn serializes_derived_fields() {
        let page = SearchResult::new(vec![7u32], 10, 2, 3);
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "items": [7],
                "totalCount": 10,
                "pageNumber": 2,
                "pageSize": 3,
                "totalPages": 4,
                "hasPreviousPage": true,
                "hasNextPage": true
            })
        );
    }
}
