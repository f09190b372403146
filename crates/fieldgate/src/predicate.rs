//! Filter compilation.
//!
//! [`Predicate::compile`] turns an ordered list of [`FilterClause`]s into a
//! single predicate over a record. Every clause is resolved against the
//! registry, checked against the operator policy, converted to the field's
//! type and type-checked before anything is evaluated, so evaluation itself
//! cannot fail.
//!
//! Clauses are combined with AND. The result set does not depend on clause
//! order; only which error surfaces first does.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, SearchError};
use crate::op::Operator;
use crate::operand::Operand;
use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::request::FilterClause;
use crate::value::{Number, Value};

/// One filter clause after compilation.
///
/// Exposed so that backends which translate predicates (rather than
/// evaluate them) can read the resolved field, operator and typed operand.
pub struct CompiledClause<'r, T> {
    field: &'r FieldDescriptor<T>,
    operator: Operator,
    operand: Operand,
}

impl<'r, T> CompiledClause<'r, T> {
    /// The resolved field.
    pub fn field(&self) -> &'r FieldDescriptor<T> {
        self.field
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The clause value, converted to the field's type.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Evaluates this clause against a record.
    pub fn matches(&self, record: &T) -> bool {
        let value = self.field.read(record);
        match (&self.operand, &value) {
            // Explicit null only supports equality (enforced at compile time)
            (Operand::Null, Value::None) => self.operator == Operator::Equals,
            (Operand::Null, _) => self.operator == Operator::NotEquals,

            // An absent value is unequal to every non-null operand
            (_, Value::None) => self.operator == Operator::NotEquals,

            (Operand::String(pattern), Value::String(s)) => self.match_string(s, pattern),
            (Operand::Number(clause), Value::Number(field)) => self.match_number(*field, *clause),
            (Operand::Timestamp(clause), Value::Timestamp(field)) => {
                self.operator.eval_ordering(field.cmp(clause))
            }
            (Operand::Bool(clause), Value::Bool(field)) => {
                self.operator.eval_ordering(field.cmp(clause))
            }
            (Operand::Enum(clause), Value::Enum(field)) => self.match_enum(field, clause),

            // Type mismatch - the accessor disagrees with its declared type
            _ => false,
        }
    }

    fn match_string(&self, field: &str, pattern: &str) -> bool {
        match self.operator {
            Operator::Contains => field.contains(pattern),
            Operator::StartsWith => field.starts_with(pattern),
            Operator::EndsWith => field.ends_with(pattern),
            op => op.eval_ordering(field.cmp(pattern)),
        }
    }

    fn match_number(&self, field: Number, clause: Number) -> bool {
        match field.compare(clause) {
            Some(ordering) => self.operator.eval_ordering(ordering),
            // NaN is unordered: unequal to everything, never in range
            None => self.operator == Operator::NotEquals,
        }
    }

    fn match_enum(&self, field: &str, clause: &str) -> bool {
        let ordering = if field == clause {
            Ordering::Equal
        } else {
            Ordering::Less
        };
        self.operator.is_equality() && self.operator.eval_ordering(ordering)
    }
}

impl<T> fmt::Debug for CompiledClause<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledClause")
            .field("field", &self.field.name())
            .field("operator", &self.operator)
            .field("operand", &self.operand)
            .finish()
    }
}

/// A compiled, AND-combined filter predicate.
///
/// Borrows its field descriptors from the registry it was compiled against.
pub struct Predicate<'r, T> {
    clauses: Vec<CompiledClause<'r, T>>,
}

impl<'r, T> Predicate<'r, T> {
    /// Compiles filter clauses against a registry.
    ///
    /// Clauses are processed in order; the first invalid clause aborts
    /// compilation with exactly one error. An empty list compiles to a
    /// predicate that matches every record.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnmappedField`] if a field is not registered
    /// - [`SearchError::OperatorNotAllowed`] if the registry's policy
    ///   excludes the operator
    /// - [`SearchError::ValueConversion`] if the value cannot be converted
    ///   to the field's type, including `null` for a non-nullable field
    /// - [`SearchError::Configuration`] for a range operator on a type
    ///   other than a number or timestamp
    /// - [`SearchError::TypeMismatch`] for a string operator on a
    ///   non-string field
    pub fn compile(filters: &[FilterClause], registry: &'r FieldRegistry<T>) -> Result<Self> {
        let clauses = filters
            .iter()
            .map(|clause| compile_clause(clause, registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Predicate { clauses })
    }

    /// A predicate that matches every record.
    pub fn always() -> Self {
        Predicate {
            clauses: Vec::new(),
        }
    }

    /// Tests if a record satisfies every clause.
    pub fn matches(&self, record: &T) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// The compiled clauses, in request order.
    pub fn clauses(&self) -> &[CompiledClause<'r, T>] {
        &self.clauses
    }

    /// Returns `true` if this predicate has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl<T> fmt::Debug for Predicate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.clauses).finish()
    }
}

fn compile_clause<'r, T>(
    clause: &FilterClause,
    registry: &'r FieldRegistry<T>,
) -> Result<CompiledClause<'r, T>> {
    let field = registry.resolve(&clause.field)?;
    let operator = clause.operator;

    if !registry.is_operator_allowed(operator) {
        return Err(SearchError::OperatorNotAllowed { operator });
    }

    let value_type = field.value_type();
    let conversion_error = |reason: String| SearchError::ValueConversion {
        field: clause.field.clone(),
        value: clause.value.to_string(),
        target: value_type,
        reason,
    };

    let operand = Operand::convert(&clause.value, value_type, field.is_nullable())
        .map_err(|e| conversion_error(e.to_string()))?;
    if operand.is_null() && !operator.is_equality() {
        return Err(conversion_error(format!(
            "null can only be compared with Equals or NotEquals, not {operator}"
        )));
    }

    if operator.is_range() && !value_type.supports_range() {
        return Err(SearchError::configuration(format!(
            "operator '{operator}' needs a numeric or timestamp field, but field '{}' is {value_type}",
            field.name()
        )));
    }
    if operator.is_string_op() && !value_type.is_string() {
        return Err(SearchError::TypeMismatch {
            field: field.name().to_string(),
            operator,
            actual: value_type,
        });
    }

    Ok(CompiledClause {
        field,
        operator,
        operand,
    })
}
