//! Proc macros for Fieldgate.
//!
//! This crate provides [`Searchable`], a derive that builds a
//! `fieldgate::FieldRegistry` from struct field annotations. Use it
//! through the `fieldgate` crate, which re-exports it.

mod search;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Searchable` trait for structs with searchable fields.
///
/// This macro generates an implementation of `fieldgate::Searchable` that
/// registers every annotated field with a typed accessor. The value type of
/// each field comes from its Rust type through `fieldgate::FieldValue`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[search]` | Register this field under its own name |
/// | `#[search(rename = "...")]` | Register under a custom name |
/// | `#[search(skip)]` | Exclude this field |
///
/// Fields without a `#[search]` attribute are not registered. Two fields
/// whose names differ only in case, or that map to the same constant, are
/// a compile error.
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[search(operators(...))]` | Restrict the registry's operator set |
///
/// The operator set is global to the registry, not per field.
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Product::NAME`, `Product::CUSTOM_PRICE`)
/// 2. Implementation of `Searchable::register_fields()`
///
/// # Example
///
/// ```ignore
/// use fieldgate::{FieldRegistry, SearchRequest, Operator, Searchable};
///
/// #[derive(Searchable)]
/// #[search(operators(Equals, LessThan))]
/// struct Product {
///     #[search]
///     name: String,
///
///     #[search(rename = "cost")]
///     price: f64,
///
///     supplier_notes: String,
/// }
///
/// let registry = FieldRegistry::<Product>::from_searchable()?;
/// let request = SearchRequest::new().filter(Product::COST, Operator::LessThan, 2.0);
/// ```
#[proc_macro_derive(Searchable, attributes(search))]
pub fn searchable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    search::searchable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
