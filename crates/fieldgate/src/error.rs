//! Error types for the fieldgate crate.

use thiserror::Error;

use crate::op::Operator;
use crate::value::ValueType;

/// Errors that can occur when registering fields or running a search.
///
/// Every variant except registration-time `Configuration` stems from
/// caller-supplied request data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Invalid registration, or an operator applied to a type that cannot
    /// support it.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Field name absent from the registry.
    #[error("field '{field}' is not mapped")]
    UnmappedField { field: String },

    /// Operator excluded by the registry's operator policy.
    #[error("operator '{operator}' is not allowed")]
    OperatorNotAllowed { operator: Operator },

    /// Operator incompatible with the field's value type.
    #[error("operator '{operator}' cannot be applied to field '{field}' of type {actual}")]
    TypeMismatch {
        field: String,
        operator: Operator,
        actual: ValueType,
    },

    /// Clause value cannot be converted to the field's type.
    #[error("cannot convert value {value} for field '{field}' to {target}: {reason}")]
    ValueConversion {
        field: String,
        value: String,
        target: ValueType,
        reason: String,
    },

    /// Page number or page size out of range.
    #[error("invalid request: {message}")]
    Validation { message: String },
}

impl SearchError {
    /// Returns the fieldless kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Configuration { .. } => ErrorKind::Configuration,
            SearchError::UnmappedField { .. } => ErrorKind::UnmappedField,
            SearchError::OperatorNotAllowed { .. } => ErrorKind::OperatorNotAllowed,
            SearchError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            SearchError::ValueConversion { .. } => ErrorKind::ValueConversion,
            SearchError::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        SearchError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        SearchError::Validation {
            message: message.into(),
        }
    }
}

/// Discriminant of [`SearchError`], for mapping errors to host responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    UnmappedField,
    OperatorNotAllowed,
    TypeMismatch,
    ValueConversion,
    Validation,
}

/// Result type for fieldgate operations.
pub type Result<T> = std::result::Result<T, SearchError>;
