//! Sort compilation.
//!
//! Provides [`Direction`] and [`SortOrder`], the composite comparator built
//! from an ordered list of [`SortDirective`]s. The first directive is the
//! primary key; each later one only breaks ties left by all keys before it.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::request::SortDirective;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl Direction {
    /// Returns `true` if this is ascending order.
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Ascending)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Ascending`, returns the ordering unchanged.
    /// For `Descending`, reverses it.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "Ascending",
            Direction::Descending => "Descending",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct SortKey<'r, T> {
    field: &'r FieldDescriptor<T>,
    direction: Direction,
}

/// A compiled multi-key comparator over records of `T`.
///
/// Borrows its field descriptors from the registry it was compiled against.
///
/// # Example
///
/// ```
/// use fieldgate::{FieldRegistry, SortDirective, SortOrder};
///
/// struct Product {
///     category: String,
///     price: f64,
/// }
///
/// let registry = FieldRegistry::<Product>::new()
///     .register("Category", |p: &Product| &p.category)?
///     .register("Price", |p: &Product| &p.price)?;
///
/// let order = SortOrder::compile(
///     &[SortDirective::asc("category"), SortDirective::desc("price")],
///     &registry,
/// )?;
///
/// let products = [
///     Product { category: "Fruit".into(), price: 0.75 },
///     Product { category: "Bakery".into(), price: 2.0 },
///     Product { category: "Fruit".into(), price: 1.5 },
/// ];
/// let mut refs: Vec<&Product> = products.iter().collect();
/// order.sort(&mut refs);
///
/// let prices: Vec<f64> = refs.iter().map(|p| p.price).collect();
/// assert_eq!(prices, [2.0, 1.5, 0.75]);
/// # Ok::<(), fieldgate::SearchError>(())
/// ```
pub struct SortOrder<'r, T> {
    keys: Vec<SortKey<'r, T>>,
}

impl<'r, T> SortOrder<'r, T> {
    /// Compiles sort directives against a registry.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnmappedField`] if a field is not registered
    /// - [`SearchError::Configuration`] if a field's type has no total order
    pub fn compile(directives: &[SortDirective], registry: &'r FieldRegistry<T>) -> Result<Self> {
        let keys = directives
            .iter()
            .map(|directive| {
                let field = registry.resolve(&directive.field)?;
                if !field.value_type().is_sortable() {
                    return Err(SearchError::configuration(format!(
                        "field '{}' of type {} cannot be sorted",
                        field.name(),
                        field.value_type()
                    )));
                }
                Ok(SortKey {
                    field,
                    direction: directive.direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SortOrder { keys })
    }

    /// Returns `true` if there are no sort keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compares two records key by key.
    ///
    /// Returns `Equal` only if every key compares equal.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for key in &self.keys {
            let ordering = compare_values(&key.field.read(a), &key.field.read(b));
            if ordering != Ordering::Equal {
                return key.direction.apply(ordering);
            }
        }
        Ordering::Equal
    }

    /// Sorts borrowed records in place.
    ///
    /// The sort is stable, so records equal on every key keep their
    /// relative order. With no keys this is a no-op.
    pub fn sort(&self, records: &mut [&T]) {
        if self.keys.is_empty() {
            return;
        }
        records.sort_by(|a, b| self.compare(a, b));
    }
}

impl<T> fmt::Debug for SortOrder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.keys
                    .iter()
                    .map(|key| (key.field.name(), key.direction)),
            )
            .finish()
    }
}

/// Compares two field values of the same type.
///
/// Absent values sort before present ones, so they come first in ascending
/// order and last in descending order. Numbers use a total order, so NaN
/// does not break sorting. Values of different types compare equal.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),

        // None is the smallest value
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Less,
        (_, Value::None) => Ordering::Greater,

        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldValue, Number, Timestamp, ValueType};

    #[test]
    fn direction_apply() {
        assert_eq!(Direction::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Direction::Ascending.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Direction::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Descending.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn direction_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Direction::Descending).unwrap(),
            "\"Descending\""
        );
        let dir: Direction = serde_json::from_str("\"Ascending\"").unwrap();
        assert_eq!(dir, Direction::Ascending);
        assert_eq!(Direction::default(), Direction::Ascending);
    }

    #[test]
    fn compare_primitive_values() {
        assert_eq!(
            compare_values(&Value::String("apple"), &Value::String("banana")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &Value::Number(Number::I64(20)),
                &Value::Number(Number::U64(10))
            ),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(1000)),
                &Value::Timestamp(Timestamp(2000))
            ),
            Ordering::Less
        );
        // false < true
        assert_eq!(
            compare_values(&Value::Bool(false), &Value::Bool(true)),
            Ordering::Less
        );
    }

    #[test]
    fn nan_has_a_place() {
        let nan = Value::Number(Number::F64(f64::NAN));
        let one = Value::Number(Number::F64(1.0));
        assert_eq!(compare_values(&nan, &one), Ordering::Greater);
        assert_eq!(compare_values(&nan, &nan), Ordering::Equal);
    }

    #[test]
    fn none_is_smallest() {
        let none = Value::None;
        let some = Value::String("test");
        assert_eq!(compare_values(&none, &some), Ordering::Less);
        assert_eq!(compare_values(&some, &none), Ordering::Greater);
        assert_eq!(compare_values(&none, &none), Ordering::Equal);
    }

    struct Colour(&'static str);

    impl FieldValue for Colour {
        const VALUE_TYPE: ValueType = ValueType::Enum;

        fn to_value(&self) -> Value<'_> {
            Value::Enum(self.0)
        }
    }

    struct Item {
        name: String,
        priority: i64,
        due: Option<i64>,
        colour: Colour,
    }

    fn item(name: &'static str, priority: i64, due: Option<i64>) -> Item {
        Item {
            name: name.to_string(),
            priority,
            due,
            colour: Colour("Red"),
        }
    }

    fn registry() -> FieldRegistry<Item> {
        FieldRegistry::new()
            .register("name", |i: &Item| &i.name)
            .and_then(|r| r.register("priority", |i: &Item| &i.priority))
            .and_then(|r| r.register("due", |i: &Item| &i.due))
            .and_then(|r| r.register("colour", |i: &Item| &i.colour))
            .unwrap()
    }

    fn sorted<'a>(items: &'a [Item], directives: &[SortDirective]) -> Vec<&'a str> {
        let registry = registry();
        let order = SortOrder::compile(directives, &registry).unwrap();
        let mut refs: Vec<&Item> = items.iter().collect();
        order.sort(&mut refs);
        refs.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn secondary_key_breaks_ties() {
        let items = [item("b", 1, None), item("c", 2, None), item("a", 1, None)];
        assert_eq!(
            sorted(
                &items,
                &[SortDirective::desc("priority"), SortDirective::asc("name")]
            ),
            ["c", "a", "b"]
        );
    }

    #[test]
    fn equal_keys_keep_source_order() {
        let items = [item("x", 1, None), item("y", 1, None), item("z", 0, None)];
        assert_eq!(
            sorted(&items, &[SortDirective::asc("priority")]),
            ["z", "x", "y"]
        );
        assert_eq!(sorted(&items, &[]), ["x", "y", "z"]);
    }

    #[test]
    fn absent_values_first_ascending_last_descending() {
        let items = [item("a", 0, Some(5)), item("b", 0, None), item("c", 0, Some(1))];
        assert_eq!(sorted(&items, &[SortDirective::asc("due")]), ["b", "c", "a"]);
        assert_eq!(sorted(&items, &[SortDirective::desc("due")]), ["a", "c", "b"]);
    }

    #[test]
    fn unmapped_sort_field_is_rejected() {
        let registry = registry();
        let err = SortOrder::compile(&[SortDirective::asc("Unknown")], &registry).unwrap_err();
        assert!(matches!(err, SearchError::UnmappedField { field } if field == "Unknown"));
    }

    #[test]
    fn unordered_sort_field_is_rejected() {
        let registry = registry();
        let err = SortOrder::compile(&[SortDirective::asc("colour")], &registry).unwrap_err();
        assert!(matches!(err, SearchError::Configuration { .. }));
        assert_eq!(item("a", 0, None).colour.0, "Red");
    }
}
