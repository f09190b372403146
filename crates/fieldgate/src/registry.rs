//! The field whitelist.
//!
//! A [`FieldRegistry`] is the only way an external field name becomes
//! reachable by a search request. Each registered name maps to a
//! [`FieldDescriptor`]: a typed accessor bound to the record type plus the
//! field's [`ValueType`]. Names are matched case-insensitively.
//!
//! Registries are built once at startup and shared read-only afterwards.
//! The builder methods consume the registry, so a shared `&FieldRegistry`
//! can never be mutated concurrently with reads.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SearchError};
use crate::op::{Operator, OperatorSet};
use crate::traits::Searchable;
use crate::value::{FieldValue, Value, ValueType};

type Accessor<T> = Box<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>;

/// A registered, searchable field of `T`.
///
/// Owned by the registry that created it and immutable after registration.
pub struct FieldDescriptor<T> {
    name: String,
    value_type: ValueType,
    nullable: bool,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// The external name, as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the field may be absent.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Reads this field from a record.
    pub fn read<'a>(&self, record: &'a T) -> Value<'a> {
        (self.accessor)(record)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

/// A field name paired with its accessor.
///
/// Built by the [`field!`](crate::field) macro, which takes the name from
/// the struct field itself, and consumed by [`FieldRegistry::register_field`].
pub struct Field<F> {
    pub name: &'static str,
    pub accessor: F,
}

/// Builds a [`Field`] for a direct struct field, named after it.
///
/// Only a bare field identifier is accepted, so nested or computed access
/// cannot be registered this way.
///
/// ```
/// use fieldgate::{field, FieldRegistry};
///
/// struct Product {
///     name: String,
///     stock: u32,
/// }
///
/// let registry = FieldRegistry::<Product>::new()
///     .register_field(field!(name))?
///     .register_field(field!(stock))?;
///
/// assert!(registry.has_field("Name"));
/// assert!(registry.has_field("STOCK"));
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
#[macro_export]
macro_rules! field {
    ($field:ident) => {
        $crate::Field {
            name: ::core::stringify!($field),
            accessor: |record| &record.$field,
        }
    };
}

/// Whitelist of searchable fields for records of type `T`.
///
/// # Example
///
/// ```
/// use fieldgate::{FieldRegistry, Operator};
///
/// struct Product {
///     name: String,
///     price: f64,
///     internal_note: String,
/// }
///
/// let registry = FieldRegistry::<Product>::new()
///     .register("Name", |p: &Product| &p.name)?
///     .register("Price", |p: &Product| &p.price)?
///     .allow_operators([Operator::Equals, Operator::LessThan]);
///
/// assert!(registry.has_field("price"));
/// assert!(!registry.has_field("internal_note"));
/// assert!(!registry.is_operator_allowed(Operator::Contains));
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
pub struct FieldRegistry<T> {
    fields: Vec<FieldDescriptor<T>>,
    index: HashMap<String, usize>,
    allowed: OperatorSet,
}

impl<T> FieldRegistry<T> {
    /// Creates an empty registry allowing every operator.
    pub fn new() -> Self {
        FieldRegistry {
            fields: Vec::new(),
            index: HashMap::new(),
            allowed: OperatorSet::all(),
        }
    }

    /// Registers a field under an explicit external name.
    ///
    /// The accessor must return a borrow of the record, which rules out
    /// computed values; the value type comes from the borrowed Rust type.
    /// Registering a name that is already present (ignoring case) replaces
    /// the earlier mapping.
    ///
    /// Fails with [`SearchError::Configuration`] if the name is empty or
    /// contains characters other than ASCII letters, digits, `_`, `-` or `.`.
    pub fn register<V, F>(mut self, name: impl Into<String>, accessor: F) -> Result<Self>
    where
        V: FieldValue + ?Sized + 'static,
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        let name = name.into();
        validate_name(&name)?;

        let value_type = V::VALUE_TYPE;
        tracing::trace!(field = %name, %value_type, "registering search field");

        let accessor: Accessor<T> = Box::new(move |record| accessor(record).to_value());
        let descriptor = FieldDescriptor {
            name,
            value_type,
            nullable: V::NULLABLE,
            accessor,
        };

        let key = normalize(&descriptor.name);
        match self.index.get(&key) {
            Some(&slot) => self.fields[slot] = descriptor,
            None => {
                self.index.insert(key, self.fields.len());
                self.fields.push(descriptor);
            }
        }
        Ok(self)
    }

    /// Registers a field named after the struct field it reads.
    ///
    /// See [`field!`](crate::field).
    pub fn register_field<V, F>(self, field: Field<F>) -> Result<Self>
    where
        V: FieldValue + ?Sized + 'static,
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        self.register(field.name, field.accessor)
    }

    /// Replaces the allowed operator set.
    ///
    /// The set is global to the registry; the last call wins.
    pub fn allow_operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.allowed = operators.into_iter().collect();
        self
    }

    /// Looks up a field by name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.index
            .get(&normalize(name))
            .map(|&slot| &self.fields[slot])
    }

    /// Returns `true` if `name` is registered, ignoring case.
    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(&normalize(name))
    }

    /// Returns `true` if the operator policy allows `op`.
    pub fn is_operator_allowed(&self, op: Operator) -> bool {
        self.allowed.contains(op)
    }

    /// The allowed operator set.
    pub fn allowed_operators(&self) -> OperatorSet {
        self.allowed
    }

    /// Registered external names, in registration order.
    pub fn mapped_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field, failing with [`SearchError::UnmappedField`].
    pub(crate) fn resolve(&self, name: &str) -> Result<&FieldDescriptor<T>> {
        self.lookup(name).ok_or_else(|| SearchError::UnmappedField {
            field: name.to_string(),
        })
    }
}

impl<T: Searchable> FieldRegistry<T> {
    /// Builds a registry from the type's declared field metadata.
    ///
    /// Usually backed by `#[derive(Searchable)]`.
    pub fn from_searchable() -> Result<Self> {
        T::register_fields(FieldRegistry::new())
    }
}

impl<T> Default for FieldRegistry<T> {
    fn default() -> Self {
        FieldRegistry::new()
    }
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("fields", &self.fields)
            .field("allowed", &self.allowed)
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SearchError::configuration("field name must not be empty"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(SearchError::configuration(format!(
            "field name '{name}' contains invalid character {c:?}"
        )));
    }
    Ok(())
}
