//! Query error types
//!
//! Error codes:
//! - MAH_QUERY_SCHEMA_MISMATCH (FATAL severity) — raised at scan start
//! - MAH_QUERY_STORAGE_FAILED (ERROR severity)
//! - MAH_QUERY_CORRUPTION (FATAL severity)
//!
//! End-of-scan is not an error: `next_tuple` signals it as `Ok(None)`.
//! I/O and corruption failures from the storage layer propagate unchanged
//! in meaning; there is no retry logic here.

use std::fmt;

use crate::relation::RelnError;
use crate::storage::StorageError;
use crate::tuple::TupleError;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller continues
    Error,
    /// The query cannot be served at all, or stored data is corrupt
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

/// Query-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Query arity differs from the relation schema
    MahQuerySchemaMismatch,
    /// A page fetch failed mid-scan
    MahQueryStorageFailed,
    /// A fetched page or record is corrupt
    MahQueryCorruption,
}

impl QueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::MahQuerySchemaMismatch => "MAH_QUERY_SCHEMA_MISMATCH",
            QueryErrorCode::MahQueryStorageFailed => "MAH_QUERY_STORAGE_FAILED",
            QueryErrorCode::MahQueryCorruption => "MAH_QUERY_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            QueryErrorCode::MahQueryStorageFailed => Severity::Error,
            QueryErrorCode::MahQuerySchemaMismatch | QueryErrorCode::MahQueryCorruption => {
                Severity::Fatal
            }
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with full context
#[derive(Debug)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl QueryError {
    /// Query arity differs from the relation schema
    pub fn schema_mismatch(expected: usize, got: usize) -> Self {
        Self {
            code: QueryErrorCode::MahQuerySchemaMismatch,
            message: format!("relation has {} attributes, query names {}", expected, got),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
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

impl fmt::Display for QueryError {
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

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<StorageError> for QueryError {
    fn from(e: StorageError) -> Self {
        let code = if e.is_fatal() {
            QueryErrorCode::MahQueryCorruption
        } else {
            QueryErrorCode::MahQueryStorageFailed
        };
        Self {
            code,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<RelnError> for QueryError {
    fn from(e: RelnError) -> Self {
        let code = if e.is_fatal() {
            QueryErrorCode::MahQueryCorruption
        } else {
            QueryErrorCode::MahQueryStorageFailed
        };
        Self {
            code,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<TupleError> for QueryError {
    fn from(e: TupleError) -> Self {
        Self {
            code: QueryErrorCode::MahQueryCorruption,
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
