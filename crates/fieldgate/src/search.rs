//! The search pipeline.
//!
//! [`search`] runs one request end to end:
//!
//! ```text
//! validate -> compile filters -> count -> compile sorts -> fetch page
//! ```
//!
//! The first failing step ends the call with its error; a request never
//! yields a partial result. The step-wise functions ([`apply_filters`],
//! [`apply_sorting`], [`apply_pagination`]) expose single stages over
//! borrowed items. Each takes any iterator of `&T` and returns a `Vec<&T>`,
//! so they chain in pipeline order. [`SearchExt`] makes all of them
//! available as slice methods.

use crate::error::Result;
use crate::ordering::SortOrder;
use crate::predicate::Predicate;
use crate::registry::FieldRegistry;
use crate::request::SearchRequest;
use crate::result::SearchResult;
use crate::source::DataSource;

/// Runs a search request against a data source.
///
/// # Errors
///
/// - [`SearchError::Validation`](crate::SearchError::Validation) if the
///   page number or page size is 0; nothing else runs
/// - any error from [`Predicate::compile`] or [`SortOrder::compile`]
///
/// # Example
///
/// ```
/// use fieldgate::{search, FieldRegistry, Operator, SearchRequest};
///
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// let registry = FieldRegistry::<Product>::new()
///     .register("Name", |p: &Product| &p.name)?
///     .register("Price", |p: &Product| &p.price)?;
///
/// let products = vec![
///     Product { name: "Apple".into(), price: 1.5 },
///     Product { name: "Banana".into(), price: 0.75 },
/// ];
///
/// let request = SearchRequest::new().filter("price", Operator::LessThan, 1.0);
/// let result = search(products.as_slice(), &request, &registry)?;
///
/// assert_eq!(result.total_count(), 1);
/// assert_eq!(result.items()[0].name, "Banana");
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
pub fn search<T, S>(
    source: S,
    request: &SearchRequest,
    registry: &FieldRegistry<T>,
) -> Result<SearchResult<S::Item>>
where
    S: DataSource<T>,
{
    run(&source, request, registry).inspect_err(|err| {
        tracing::warn!(error = %err, kind = ?err.kind(), "search request rejected");
    })
}

fn run<T, S>(
    source: &S,
    request: &SearchRequest,
    registry: &FieldRegistry<T>,
) -> Result<SearchResult<S::Item>>
where
    S: DataSource<T>,
{
    let window = request.window()?;
    tracing::debug!(
        filters = request.filters.len(),
        sorts = request.sorts.len(),
        page_number = request.page_number,
        page_size = request.page_size,
        "search request accepted"
    );

    let predicate = Predicate::compile(&request.filters, registry)?;
    tracing::debug!(clauses = predicate.clauses().len(), "filters compiled");

    let total_count = source.count(&predicate);
    tracing::debug!(total_count, "matching records counted");

    let order = SortOrder::compile(&request.sorts, registry)?;
    let items = source.fetch(&predicate, &order, window);
    tracing::debug!(
        skip = window.skip,
        take = window.take,
        items = items.len(),
        "page window applied"
    );

    Ok(SearchResult::new(
        items,
        total_count,
        request.page_number,
        request.page_size,
    ))
}

/// Keeps the items matching every filter of `request`, in input order.
///
/// Sorting and pagination in the request are ignored.
pub fn apply_filters<'a, T, I>(
    items: I,
    request: &SearchRequest,
    registry: &FieldRegistry<T>,
) -> Result<Vec<&'a T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
{
    let predicate = Predicate::compile(&request.filters, registry)?;
    Ok(items
        .into_iter()
        .filter(|item| predicate.matches(item))
        .collect())
}

/// Orders items by the sorts of `request`.
///
/// Filters and pagination in the request are ignored. With no sorts, the
/// items keep their input order.
pub fn apply_sorting<'a, T, I>(
    items: I,
    request: &SearchRequest,
    registry: &FieldRegistry<T>,
) -> Result<Vec<&'a T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
{
    let order = SortOrder::compile(&request.sorts, registry)?;
    let mut sorted: Vec<&'a T> = items.into_iter().collect();
    order.sort(&mut sorted);
    Ok(sorted)
}

/// Returns the page of `items` selected by `request`.
///
/// Page number and size are validated exactly as [`search`] does. A page
/// past the end is empty, not an error.
///
/// ```
/// use fieldgate::{apply_filters, apply_pagination, apply_sorting};
/// use fieldgate::{Direction, FieldRegistry, Operator, SearchRequest};
///
/// let registry = FieldRegistry::<u32>::new().register("n", |n: &u32| n)?;
/// let numbers: Vec<u32> = (1..=9).collect();
/// let request = SearchRequest::new()
///     .filter("n", Operator::GreaterThan, 4)
///     .sort("n", Direction::Descending)
///     .page(2, 2);
///
/// let filtered = apply_filters(&numbers, &request, &registry)?;
/// let sorted = apply_sorting(filtered, &request, &registry)?;
/// let page = apply_pagination(sorted, &request)?;
/// assert_eq!(page, [&7, &6]);
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
pub fn apply_pagination<'a, T, I>(items: I, request: &SearchRequest) -> Result<Vec<&'a T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
{
    let window = request.window()?;
    Ok(window.apply(items.into_iter()).collect())
}

/// Search operations as slice methods.
///
/// ```
/// use fieldgate::{Direction, FieldRegistry, SearchExt, SearchRequest};
///
/// struct Task {
///     title: String,
///     priority: u8,
/// }
///
/// let registry = FieldRegistry::<Task>::new()
///     .register("Title", |t: &Task| &t.title)?
///     .register("Priority", |t: &Task| &t.priority)?;
///
/// let tasks = vec![
///     Task { title: "Write docs".into(), priority: 3 },
///     Task { title: "Fix bug".into(), priority: 5 },
/// ];
///
/// let request = SearchRequest::new().sort("priority", Direction::Descending);
/// let page = tasks.apply_search(&request, &registry)?;
/// assert_eq!(page.items()[0].title, "Fix bug");
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
pub trait SearchExt<T> {
    /// Runs the full pipeline. See [`search`].
    fn apply_search(
        &self,
        request: &SearchRequest,
        registry: &FieldRegistry<T>,
    ) -> Result<SearchResult<&T>>;

    /// See [`apply_filters`].
    fn apply_filters(&self, request: &SearchRequest, registry: &FieldRegistry<T>)
        -> Result<Vec<&T>>;

    /// See [`apply_sorting`].
    fn apply_sorting(&self, request: &SearchRequest, registry: &FieldRegistry<T>)
        -> Result<Vec<&T>>;

    /// See [`apply_pagination`].
    fn apply_pagination(&self, request: &SearchRequest) -> Result<Vec<&T>>;
}

impl<T> SearchExt<T> for [T] {
    fn apply_search(
        &self,
        request: &SearchRequest,
        registry: &FieldRegistry<T>,
    ) -> Result<SearchResult<&T>> {
        search(self, request, registry)
    }

    fn apply_filters(
        &self,
        request: &SearchRequest,
        registry: &FieldRegistry<T>,
    ) -> Result<Vec<&T>> {
        apply_filters(self, request, registry)
    }

    fn apply_sorting(
        &self,
        request: &SearchRequest,
        registry: &FieldRegistry<T>,
    ) -> Result<Vec<&T>> {
        apply_sorting(self, request, registry)
    }

    fn apply_pagination(&self, request: &SearchRequest) -> Result<Vec<&T>> {
        apply_pagination(self, request)
    }
}
