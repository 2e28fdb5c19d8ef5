//! Observability subsystem for mahdb
//!
//! Structured logging and typed lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only: no side effects on execution
//! 2. Synchronous, unbuffered, deterministic output
//! 3. One log line = one event
//! 4. The library core stays silent; events are logged at the CLI layer

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Logs a lifecycle event to stdout.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(Severity::Info, event.as_str(), fields);
}

/// Logs a lifecycle event to stderr, for commands whose stdout is data.
pub fn log_event_stderr(event: Event, fields: &[(&str, &str)]) {
    Logger::log_stderr(Severity::Info, event.as_str(), fields);
}
