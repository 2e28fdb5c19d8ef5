//! Storage error types
//!
//! Error codes:
//! - MAH_STORAGE_IO_ERROR (ERROR severity)
//! - MAH_STORAGE_READ_FAILED (ERROR severity)
//! - MAH_STORAGE_WRITE_FAILED (ERROR severity)
//! - MAH_PAGE_CORRUPTION (FATAL severity)
//!
//! Every page read verifies its checksum; a verification failure is FATAL
//! corruption and the operation aborts.

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller continues
    Error,
    /// Stored data is corrupt, mahdb must stop
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

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// File open/metadata failure
    MahStorageIoError,
    /// Page read failed
    MahStorageReadFailed,
    /// Page write failed
    MahStorageWriteFailed,
    /// Page checksum failure or structural damage
    MahPageCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::MahStorageIoError => "MAH_STORAGE_IO_ERROR",
            StorageErrorCode::MahStorageReadFailed => "MAH_STORAGE_READ_FAILED",
            StorageErrorCode::MahStorageWriteFailed => "MAH_STORAGE_WRITE_FAILED",
            StorageErrorCode::MahPageCorruption => "MAH_PAGE_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::MahStorageIoError => Severity::Error,
            StorageErrorCode::MahStorageReadFailed => Severity::Error,
            StorageErrorCode::MahStorageWriteFailed => Severity::Error,
            StorageErrorCode::MahPageCorruption => Severity::Fatal,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with full context
#[derive(Debug)]
pub struct StorageError {
    /// Error code
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Optional context (page id, file path)
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StorageError {
    /// Create an I/O error (open, metadata)
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::MahStorageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a page read failure
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::MahStorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a page write failure
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::MahStorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a corruption error (FATAL)
    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::MahPageCorruption,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a corruption error carrying the damaged page id
    pub fn corruption_at_page(page_id: u32, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::MahPageCorruption,
            message: reason.into(),
            details: Some(format!("page_id: {}", page_id)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
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

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StorageErrorCode::MahStorageIoError.code(),
            "MAH_STORAGE_IO_ERROR"
        );
        assert_eq!(
            StorageErrorCode::MahPageCorruption.code(),
            "MAH_PAGE_CORRUPTION"
        );
    }

    #[test]
    fn test_corruption_is_fatal() {
        let err = StorageError::corruption_at_page(7, "checksum mismatch");
        assert!(err.is_fatal());
        assert_eq!(err.details(), Some("page_id: 7"));
    }

    #[test]
    fn test_read_failed_not_fatal() {
        let err = StorageError::read_failed(
            "short read",
            io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_display_carries_code_and_details() {
        let err = StorageError::corruption_at_page(3, "checksum mismatch");
        let display = format!("{}", err);
        assert!(display.contains("FATAL"));
        assert!(display.contains("MAH_PAGE_CORRUPTION"));
        assert!(display.contains("page_id: 3"));
    }
}
