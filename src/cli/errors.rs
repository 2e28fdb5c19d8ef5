//! CLI-specific error types
//!
//! Every CLI failure ends the process with a non-zero exit, so there is no
//! severity ladder here. Subsystem errors pass through with their own code
//! and severity already rendered into the message.

use std::fmt;
use std::io;

use crate::query::QueryError;
use crate::relation::RelnError;
use crate::tuple::TupleError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// stdin/stdout failure
    IoError,
    /// Malformed tuple line on stdin
    BadInput,
    /// A subsystem error, carried through verbatim
    Subsystem,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "MAH_CLI_IO_ERROR",
            Self::BadInput => "MAH_CLI_BAD_INPUT",
            Self::Subsystem => "MAH_CLI_SUBSYSTEM",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// stdin/stdout failure
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self {
            code: CliErrorCode::IoError,
            message: msg.into(),
        }
    }

    /// Malformed tuple line on stdin
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self {
            code: CliErrorCode::BadInput,
            message: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            // Subsystem messages already carry their own code and severity.
            CliErrorCode::Subsystem => write!(f, "{}", self.message),
            _ => write!(f, "{}: {}", self.code.code(), self.message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<RelnError> for CliError {
    fn from(e: RelnError) -> Self {
        Self {
            code: CliErrorCode::Subsystem,
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self {
            code: CliErrorCode::Subsystem,
            message: e.to_string(),
        }
    }
}

impl From<TupleError> for CliError {
    fn from(e: TupleError) -> Self {
        Self::bad_input(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_errors_carry_cli_code() {
        let err = CliError::io_error("stdin closed");
        assert_eq!(format!("{}", err), "MAH_CLI_IO_ERROR: stdin closed");
    }

    #[test]
    fn test_subsystem_errors_pass_through() {
        let err: CliError = RelnError::not_found("/tmp/none").into();
        let display = format!("{}", err);
        assert!(display.contains("MAH_RELN_NOT_FOUND"));
        assert!(!display.contains("MAH_CLI"));
    }
}
