//! Tuple error types
//!
//! Error codes:
//! - MAH_TUPLE_ARITY_MISMATCH — value count differs from the relation arity
//! - MAH_TUPLE_INVALID_VALUE — a value contains a reserved character
//! - MAH_TUPLE_CORRUPT_RECORD — a stored record failed to decode

use std::fmt;

/// Tuple-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleErrorCode {
    /// Parsed value count differs from the schema arity
    ArityMismatch,
    /// A value contains the separator, the wildcard marker, or NUL
    InvalidValue,
    /// A stored record is not a well-formed tuple
    CorruptRecord,
}

impl TupleErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArityMismatch => "MAH_TUPLE_ARITY_MISMATCH",
            Self::InvalidValue => "MAH_TUPLE_INVALID_VALUE",
            Self::CorruptRecord => "MAH_TUPLE_CORRUPT_RECORD",
        }
    }
}

/// Tuple error
#[derive(Debug)]
pub struct TupleError {
    code: TupleErrorCode,
    message: String,
}

impl TupleError {
    fn new(code: TupleErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Arity mismatch between a text form and the schema
    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Self::new(
            TupleErrorCode::ArityMismatch,
            format!("expected {} attributes, got {}", expected, got),
        )
    }

    /// A value contains a reserved character
    pub fn invalid_value(value: &str, why: &str) -> Self {
        Self::new(
            TupleErrorCode::InvalidValue,
            format!("value {:?} {}", value, why),
        )
    }

    /// A stored record failed to decode
    pub fn corrupt_record(why: impl Into<String>) -> Self {
        Self::new(TupleErrorCode::CorruptRecord, why)
    }

    /// Returns the error code
    pub fn code(&self) -> TupleErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error means stored data is corrupt rather than the
    /// caller's input being malformed
    pub fn is_corruption(&self) -> bool {
        self.code == TupleErrorCode::CorruptRecord
    }
}

impl fmt::Display for TupleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for TupleError {}

/// Result type for tuple operations
pub type TupleResult<T> = Result<T, TupleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TupleError::arity_mismatch(3, 2).code().code(),
            "MAH_TUPLE_ARITY_MISMATCH"
        );
        assert_eq!(
            TupleError::invalid_value("a?b", "contains the wildcard marker")
                .code()
                .code(),
            "MAH_TUPLE_INVALID_VALUE"
        );
    }

    #[test]
    fn test_corruption_flag() {
        assert!(TupleError::corrupt_record("not UTF-8").is_corruption());
        assert!(!TupleError::arity_mismatch(2, 1).is_corruption());
    }
}
