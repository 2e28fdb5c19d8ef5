//! Typed lifecycle events
//!
//! Every observable mahdb event has a name here; free-form event strings
//! never reach the logger from our own code.

use std::fmt;

/// Observable events in mahdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Relation creation begins
    RelnCreateStart,
    /// Relation creation complete
    RelnCreateComplete,
    /// A batch of inserts begins
    InsertBatchStart,
    /// A batch of inserts complete
    InsertBatchComplete,
    /// A partial-match scan begins
    ScanStart,
    /// A partial-match scan complete
    ScanComplete,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RelnCreateStart => "RELN_CREATE_START",
            Event::RelnCreateComplete => "RELN_CREATE_COMPLETE",
            Event::InsertBatchStart => "INSERT_BATCH_START",
            Event::InsertBatchComplete => "INSERT_BATCH_COMPLETE",
            Event::ScanStart => "SCAN_START",
            Event::ScanComplete => "SCAN_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::RelnCreateStart,
            Event::RelnCreateComplete,
            Event::InsertBatchStart,
            Event::InsertBatchComplete,
            Event::ScanStart,
            Event::ScanComplete,
        ] {
            let name = event.as_str();
            assert!(name
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
