//! Search request types.
//!
//! A [`SearchRequest`] is plain data: it deserializes from the JSON shape
//! hosts receive over the wire and carries no behaviour beyond page
//! validation. Filter values stay loosely typed until compilation.
//!
//! ```
//! use fieldgate::{Direction, Operator, SearchRequest};
//!
//! let request: SearchRequest = serde_json::from_str(r#"{
//!     "filters": [{ "field": "Category", "operator": "Equals", "value": "Fruit" }],
//!     "sorts": [{ "field": "Price", "direction": "Descending" }],
//!     "pageSize": 5
//! }"#)?;
//!
//! assert_eq!(request.filters[0].operator, Operator::Equals);
//! assert_eq!(request.sorts[0].direction, Direction::Descending);
//! assert_eq!(request.page_number, 1);
//! assert_eq!(request.page_size, 5);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Result, SearchError};
use crate::op::Operator;
use crate::ordering::Direction;

/// Page size used when a request does not name one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    /// External field name, matched case-insensitively.
    pub field: String,
    /// Comparison operator.
    #[serde(default)]
    pub operator: Operator,
    /// Loosely-typed comparison value, converted during compilation.
    #[serde(default)]
    pub value: Json,
}

impl FilterClause {
    /// Creates a filter clause.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Json>) -> Self {
        FilterClause {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDirective {
    /// External field name, matched case-insensitively.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl SortDirective {
    /// Creates a sort directive with the given direction.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        SortDirective {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending sort directive.
    pub fn asc(field: impl Into<String>) -> Self {
        SortDirective::new(field, Direction::Ascending)
    }

    /// Creates a descending sort directive.
    pub fn desc(field: impl Into<String>) -> Self {
        SortDirective::new(field, Direction::Descending)
    }
}

/// A complete search request: filters, sorts and the page to return.
///
/// Filters are AND-combined. Sorts apply in list order, first one primary.
/// Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub filters: Vec<FilterClause>,
    pub sorts: Vec<SortDirective>,
    pub page_number: usize,
    pub page_size: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            filters: Vec::new(),
            sorts: Vec::new(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    /// Creates a request for the first page with no filters or sorts.
    pub fn new() -> Self {
        SearchRequest::default()
    }

    /// Adds a filter clause.
    pub fn filter(mut self, field: impl Into<String>, operator: Operator, value: impl Into<Json>) -> Self {
        self.filters.push(FilterClause::new(field, operator, value));
        self
    }

    /// Adds a sort directive after the existing ones.
    pub fn sort(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sorts.push(SortDirective::new(field, direction));
        self
    }

    /// Sets the page number and page size.
    pub fn page(mut self, number: usize, size: usize) -> Self {
        self.page_number = number;
        self.page_size = size;
        self
    }

    /// Checks that page number and page size are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.page_number < 1 {
            return Err(SearchError::validation("pageNumber must be at least 1"));
        }
        if self.page_size < 1 {
            return Err(SearchError::validation("pageSize must be at least 1"));
        }
        Ok(())
    }

    /// The validated window of items this request selects.
    pub fn window(&self) -> Result<PageWindow> {
        self.validate()?;
        Ok(PageWindow {
            skip: (self.page_number - 1).saturating_mul(self.page_size),
            take: self.page_size,
        })
    }
}

/// A contiguous slice of an ordered result set: skip `skip` items, then
/// take at most `take`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    pub skip: usize,
    pub take: usize,
}

impl PageWindow {
    /// Applies this window to an iterator.
    pub fn apply<I: Iterator>(self, items: I) -> std::iter::Take<std::iter::Skip<I>> {
        items.skip(self.skip).take(self.take)
    }
}
