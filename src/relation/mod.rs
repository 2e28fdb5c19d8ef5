//! Relation subsystem for mahdb
//!
//! A relation is a directory: a JSON metadata document plus two page files
//! (primary buckets and overflow pages). The metadata carries the
//! linear-hashing state — depth, split pointer, page count — and the choice
//! vector fixed at creation.
//!
//! # Design Principles
//!
//! - Metadata rewrites are atomic (temp file + rename)
//! - The file grows one bucket at a time, never rehashing wholesale
//! - Buckets below the split pointer are addressed with one extra bit
//! - Scans take shared borrows; insertion requires exclusive access

mod errors;
mod meta;
mod relation;

pub use errors::{RelnError, RelnErrorCode, RelnResult, Severity};
pub use meta::{RelationMeta, META_FILE};
pub use relation::{Relation, DATA_FILE, OVFLOW_FILE};
