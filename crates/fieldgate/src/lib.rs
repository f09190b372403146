//! Fieldgate - Whitelisted search over typed record collections.
//!
//! Fieldgate turns an untrusted search request (filters, sorts, a page)
//! into a page of records, touching only the fields a host has explicitly
//! registered. It provides:
//!
//! - A field registry mapping external names to typed accessors
//! - A global operator policy per registry
//! - Filter compilation with type checking and value conversion
//! - Multi-key stable sorting
//! - Pagination with derived page metadata
//!
//! # Quick Start
//!
//! ```rust
//! use fieldgate::{search, Direction, FieldRegistry, Operator, SearchRequest};
//!
//! // Define your data
//! struct Product {
//!     name: String,
//!     category: String,
//!     price: f64,
//!     is_active: bool,
//!     supplier_notes: String,
//! }
//!
//! // Whitelist the searchable fields; everything else is unreachable
//! let registry = FieldRegistry::<Product>::new()
//!     .register("Name", |p: &Product| &p.name)?
//!     .register("Category", |p: &Product| &p.category)?
//!     .register("Price", |p: &Product| &p.price)?
//!     .register("IsActive", |p: &Product| &p.is_active)?;
//!
//! let products = vec![
//!     Product { name: "Apple".into(), category: "Fruit".into(), price: 1.5, is_active: true, supplier_notes: String::new() },
//!     Product { name: "Donut".into(), category: "Bakery".into(), price: 2.0, is_active: false, supplier_notes: String::new() },
//!     Product { name: "Eclair".into(), category: "Bakery".into(), price: 3.5, is_active: true, supplier_notes: String::new() },
//! ];
//!
//! // Build and execute a request
//! let request = SearchRequest::new()
//!     .filter("category", Operator::Equals, "Bakery")
//!     .sort("price", Direction::Descending)
//!     .page(1, 10);
//!
//! let result = search(products.as_slice(), &request, &registry)?;
//! assert_eq!(result.total_count(), 2);
//! assert_eq!(result.items()[0].name, "Eclair");
//!
//! // Unregistered fields are rejected, never read
//! let sneaky = SearchRequest::new().filter("supplier_notes", Operator::Contains, "x");
//! assert!(search(products.as_slice(), &sneaky, &registry).is_err());
//! # Ok::<(), fieldgate::SearchError>(())
//! ```
//!
//! # Pipeline
//!
//! Each call runs a fixed sequence and stops at the first error:
//!
//! ```text
//! validate -> filter -> count -> sort -> paginate
//! ```
//!
//! - **Filters** are AND-combined; an empty list matches everything
//! - **Count** covers every matching record, before pagination
//! - **Sorts** apply in list order, the first being the primary key; the
//!   sort is stable
//! - **Pages** are 1-based; a page past the end is empty, not an error
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | `Equals`, `NotEquals`, text |
//! | Integer, Unsigned, Float, Decimal | `Equals`, `NotEquals`, range |
//! | Timestamp | `Equals`, `NotEquals`, range |
//! | Bool, Enum | `Equals`, `NotEquals` |
//!
//! Range operators are `GreaterThan`, `GreaterThanOrEqual`, `LessThan` and
//! `LessThanOrEqual`; text operators are `Contains`, `StartsWith` and
//! `EndsWith`. `Option<V>` fields are nullable: `Equals null` finds absent
//! values and range or text operators never match them. Every type except
//! Enum can be sorted, with absent values first in ascending order.
//!
//! # Derive
//!
//! `#[derive(Searchable)]` builds the registry from field attributes; see
//! [`Searchable`](trait@Searchable).

mod error;
mod op;
mod operand;
mod ordering;
mod predicate;
mod registry;
mod request;
mod result;
mod search;
mod source;
mod traits;
mod value;

// Re-export public API
pub use error::{ErrorKind, Result, SearchError};
pub use op::{Operator, OperatorSet, UnknownOperator};
pub use operand::{ConversionError, Operand};
pub use ordering::{compare_values, Direction, SortOrder};
pub use predicate::{CompiledClause, Predicate};
pub use registry::{Field, FieldDescriptor, FieldRegistry};
pub use request::{FilterClause, PageWindow, SearchRequest, SortDirective, DEFAULT_PAGE_SIZE};
pub use result::SearchResult;
pub use search::{apply_filters, apply_pagination, apply_sorting, search, SearchExt};
pub use source::DataSource;
pub use traits::Searchable;
pub use value::{FieldValue, Number, Timestamp, Value, ValueType};

// Re-export derive macro
pub use fieldgate_macros::Searchable;
