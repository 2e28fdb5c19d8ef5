//! Structured JSON logger
//!
//! One log line = one event. Lines are built by hand so field ordering is
//! deterministic (event, severity, then fields alphabetically) and logging
//! allocates nothing beyond the line itself. Writes are synchronous and
//! unbuffered; a failed write is ignored — logging must never affect
//! execution.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Recoverable issues
    Warn,
    /// Operation failures
    Error,
    /// Unrecoverable, process exits
    Fatal,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The structured logger. Stateless; every call stands alone.
pub struct Logger;

impl Logger {
    /// Logs an event to stdout.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::write_line(severity, event, fields, &mut io::stdout());
    }

    /// Logs an event to stderr, keeping stdout free for data output.
    pub fn log_stderr(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::write_line(severity, event, fields, &mut io::stderr());
    }

    fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], out: &mut W) {
        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":\"");
        Self::escape_into(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        for (key, value) in sorted {
            line.push_str(",\"");
            Self::escape_into(&mut line, key);
            line.push_str("\":\"");
            Self::escape_into(&mut line, value);
            line.push('"');
        }
        line.push_str("}\n");

        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    fn escape_into(out: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
    }
}
