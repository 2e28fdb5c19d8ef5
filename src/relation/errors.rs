//! Relation error types
//!
//! Error codes:
//! - MAH_RELN_EXISTS (ERROR severity)
//! - MAH_RELN_NOT_FOUND (ERROR severity)
//! - MAH_RELN_BAD_PARAMS (ERROR severity)
//! - MAH_RELN_BAD_CHOICE_VECTOR (ERROR severity)
//! - MAH_RELN_ARITY_MISMATCH (ERROR severity)
//! - MAH_RELN_TUPLE_TOO_LARGE (ERROR severity)
//! - MAH_RELN_STORAGE_FAILED (ERROR severity)
//! - MAH_RELN_META_INVALID (FATAL severity)
//! - MAH_RELN_CORRUPTION (FATAL severity)

use std::fmt;

use crate::hashing::ChVecError;
use crate::storage::StorageError;
use crate::tuple::TupleError;

/// Severity levels for relation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller continues
    Error,
    /// The relation's stored state is unusable, mahdb must stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Relation-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelnErrorCode {
    /// The target directory already holds a relation
    MahRelnExists,
    /// No relation at the target directory
    MahRelnNotFound,
    /// Invalid creation parameters
    MahRelnBadParams,
    /// Malformed choice vector description
    MahRelnBadChoiceVector,
    /// Tuple arity differs from the relation schema
    MahRelnArityMismatch,
    /// A tuple record exceeds the page data region
    MahRelnTupleTooLarge,
    /// A page read or write failed
    MahRelnStorageFailed,
    /// The metadata document is missing fields or self-inconsistent
    MahRelnMetaInvalid,
    /// Stored pages or records are corrupt
    MahRelnCorruption,
}

impl RelnErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RelnErrorCode::MahRelnExists => "MAH_RELN_EXISTS",
            RelnErrorCode::MahRelnNotFound => "MAH_RELN_NOT_FOUND",
            RelnErrorCode::MahRelnBadParams => "MAH_RELN_BAD_PARAMS",
            RelnErrorCode::MahRelnBadChoiceVector => "MAH_RELN_BAD_CHOICE_VECTOR",
            RelnErrorCode::MahRelnArityMismatch => "MAH_RELN_ARITY_MISMATCH",
            RelnErrorCode::MahRelnTupleTooLarge => "MAH_RELN_TUPLE_TOO_LARGE",
            RelnErrorCode::MahRelnStorageFailed => "MAH_RELN_STORAGE_FAILED",
            RelnErrorCode::MahRelnMetaInvalid => "MAH_RELN_META_INVALID",
            RelnErrorCode::MahRelnCorruption => "MAH_RELN_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            RelnErrorCode::MahRelnMetaInvalid | RelnErrorCode::MahRelnCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for RelnErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Relation error with full context
#[derive(Debug)]
pub struct RelnError {
    code: RelnErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RelnError {
    fn new(code: RelnErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// The target directory already holds a relation
    pub fn exists(dir: impl fmt::Display) -> Self {
        Self::new(
            RelnErrorCode::MahRelnExists,
            format!("a relation already exists at {}", dir),
        )
    }

    /// No relation at the target directory
    pub fn not_found(dir: impl fmt::Display) -> Self {
        Self::new(
            RelnErrorCode::MahRelnNotFound,
            format!("no relation found at {}", dir),
        )
    }

    /// Invalid creation parameters
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new(RelnErrorCode::MahRelnBadParams, message)
    }

    /// Tuple arity differs from the relation schema
    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Self::new(
            RelnErrorCode::MahRelnArityMismatch,
            format!("relation has {} attributes, tuple has {}", expected, got),
        )
    }

    /// A tuple record exceeds the page data region
    pub fn tuple_too_large(size: usize, limit: usize) -> Self {
        Self::new(
            RelnErrorCode::MahRelnTupleTooLarge,
            format!("record of {} bytes exceeds the page data region ({} bytes)", size, limit),
        )
    }

    /// The metadata document is missing, malformed or self-inconsistent
    pub fn meta_invalid(message: impl Into<String>) -> Self {
        Self::new(RelnErrorCode::MahRelnMetaInvalid, message)
    }

    /// Returns the error code
    pub fn code(&self) -> RelnErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for RelnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for RelnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<StorageError> for RelnError {
    fn from(e: StorageError) -> Self {
        let code = if e.is_fatal() {
            RelnErrorCode::MahRelnCorruption
        } else {
            RelnErrorCode::MahRelnStorageFailed
        };
        Self {
            code,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<TupleError> for RelnError {
    fn from(e: TupleError) -> Self {
        let code = if e.is_corruption() {
            RelnErrorCode::MahRelnCorruption
        } else {
            RelnErrorCode::MahRelnBadParams
        };
        Self {
            code,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<ChVecError> for RelnError {
    fn from(e: ChVecError) -> Self {
        Self {
            code: RelnErrorCode::MahRelnBadChoiceVector,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

/// Result type for relation operations
pub type RelnResult<T> = Result<T, RelnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RelnError::exists("/tmp/r").code().code(), "MAH_RELN_EXISTS");
        assert_eq!(
            RelnError::arity_mismatch(3, 2).code().code(),
            "MAH_RELN_ARITY_MISMATCH"
        );
    }

    #[test]
    fn test_meta_invalid_is_fatal() {
        assert!(RelnError::meta_invalid("depth out of range").is_fatal());
        assert!(!RelnError::bad_params("npages must be a power of two").is_fatal());
    }

    #[test]
    fn test_storage_fatality_carries_over() {
        let fatal: RelnError = StorageError::corruption("checksum mismatch").into();
        assert!(fatal.is_fatal());
        assert_eq!(fatal.code().code(), "MAH_RELN_CORRUPTION");

        let soft: RelnError = StorageError::read_failed(
            "short read",
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
        )
        .into();
        assert!(!soft.is_fatal());
    }
}
