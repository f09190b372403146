//! Filter operators and the operator policy.
//!
//! The [`Operator`] enum lists every comparison a filter clause may request.
//! [`OperatorSet`] is the allow-list a registry checks requested operators
//! against.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comparison operator for a filter clause.
///
/// Operators are grouped by the field types they support:
/// - **Equality**: `Equals`, `NotEquals` - every type
/// - **Range**: `GreaterThan`, `GreaterThanOrEqual`, `LessThan`,
///   `LessThanOrEqual` - types with a total order
/// - **String**: `Contains`, `StartsWith`, `EndsWith` - string fields only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (exact match).
    #[default]
    Equals,
    /// Not equal.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanOrEqual,
    /// String contains substring.
    Contains,
    /// String starts with prefix.
    StartsWith,
    /// String ends with suffix.
    EndsWith,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 9] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// Returns `true` for `Equals` and `NotEquals`.
    pub fn is_equality(self) -> bool {
        matches!(self, Operator::Equals | Operator::NotEquals)
    }

    /// Returns `true` if this operator needs a total order on the field type.
    pub fn is_range(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
        )
    }

    /// Returns `true` if this operator is only valid for string fields.
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }

    /// Evaluates an equality or range operator given an ordering result.
    ///
    /// `ordering` is the field value compared to the clause value.
    /// String operators never match an ordering.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equals => ordering == Ordering::Equal,
            Operator::NotEquals => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => false,
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "NotEquals",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanOrEqual => "GreaterThanOrEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanOrEqual => "LessThanOrEqual",
            Operator::Contains => "Contains",
            Operator::StartsWith => "StartsWith",
            Operator::EndsWith => "EndsWith",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operator name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Parses a wire name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// A set of operators.
///
/// Registries start with [`OperatorSet::all`]; restricting it is global to
/// the registry, not per field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorSet(u16);

impl OperatorSet {
    /// The set containing every operator.
    pub fn all() -> Self {
        Operator::ALL.into_iter().collect()
    }

    /// The empty set.
    pub fn empty() -> Self {
        OperatorSet(0)
    }

    /// Returns `true` if `op` is in the set.
    pub fn contains(self, op: Operator) -> bool {
        self.0 & op.bit() != 0
    }

    /// Adds `op` to the set.
    pub fn insert(&mut self, op: Operator) {
        self.0 |= op.bit();
    }

    /// Returns `true` if the set has no operators.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the operators in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Operator> {
        Operator::ALL.into_iter().filter(move |op| self.contains(*op))
    }
}

impl Default for OperatorSet {
    fn default() -> Self {
        OperatorSet::all()
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        let mut set = OperatorSet::empty();
        for op in iter {
            set.insert(op);
        }
        set
    }
}

impl fmt::Debug for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
