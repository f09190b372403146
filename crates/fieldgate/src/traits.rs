//! Traits for derive macro support.
//!
//! This module provides the [`Searchable`] trait which is implemented by
//! the `#[derive(Searchable)]` macro to populate a registry from field
//! annotations.

use crate::error::Result;
use crate::registry::FieldRegistry;

/// Trait for types that declare their own searchable fields.
///
/// This trait is typically derived using `#[derive(Searchable)]`, but can
/// also be implemented manually. It runs once at startup and feeds the same
/// registration surface as manual configuration.
///
/// # Derive Usage
///
/// ```
/// use fieldgate::{FieldRegistry, Operator, Searchable};
///
/// #[derive(Searchable)]
/// #[search(operators(Equals, Contains))]
/// struct Product {
///     #[search]
///     name: String,
///     #[search(rename = "custom_price")]
///     price: f64,
///     internal_note: String,
/// }
///
/// let registry = FieldRegistry::<Product>::from_searchable()?;
/// assert!(registry.has_field("name"));
/// assert!(registry.has_field("custom_price"));
/// assert!(!registry.has_field("internal_note"));
/// assert!(!registry.is_operator_allowed(Operator::GreaterThan));
/// assert_eq!(Product::CUSTOM_PRICE, "custom_price");
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
///
/// # Manual Implementation
///
/// ```
/// use fieldgate::{FieldRegistry, Result, Searchable};
///
/// struct Task {
///     title: String,
///     priority: u8,
/// }
///
/// impl Searchable for Task {
///     fn register_fields(registry: FieldRegistry<Self>) -> Result<FieldRegistry<Self>> {
///         registry
///             .register("title", |t: &Task| &t.title)?
///             .register("priority", |t: &Task| &t.priority)
///     }
/// }
///
/// let registry = FieldRegistry::<Task>::from_searchable()?;
/// assert_eq!(registry.len(), 2);
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
pub trait Searchable: Sized {
    /// Registers this type's searchable fields and operator policy.
    fn register_fields(registry: FieldRegistry<Self>) -> Result<FieldRegistry<Self>>;
}
