//! mahdb - a multi-attribute linear-hashed file store
//!
//! Tuples live in disk-resident bucket pages whose addresses are composite
//! hashes: each address bit is drawn, via the relation's choice vector,
//! from one attribute's hash. Partial-match queries (`"1234,?,abc"`) visit
//! only the buckets consistent with the bits their specified attributes
//! determine, while the file grows linear-hash style, one bucket at a
//! time.

pub mod cli;
pub mod hashing;
pub mod observability;
pub mod query;
pub mod relation;
pub mod storage;
pub mod tuple;
