//! Query subsystem for mahdb
//!
//! Partial-match scans over a multi-attribute linear-hashed relation. A
//! query names one value per attribute, `?` for "any"; the scan visits
//! only the buckets whose address agrees with the hash bits the specified
//! attributes determine, walking each bucket's overflow chain and
//! filtering every candidate tuple against the pattern.
//!
//! # Design Principles
//!
//! - The scan is explicit mutable cursor state, advanced one call at a time
//! - Candidate buckets arrive in strictly increasing id order
//! - The final per-attribute filter is never skipped
//! - End-of-scan is a normal signal (`Ok(None)`), sticky once reached

mod errors;
mod pattern;
mod scan;

pub use errors::{QueryError, QueryErrorCode, QueryResult, Severity};
pub use pattern::QueryPattern;
pub use scan::Scan;
