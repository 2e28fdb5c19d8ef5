//! Hashing subsystem for mahdb
//!
//! Multi-attribute hashing: a bucket address is not the hash of a whole
//! tuple but a composite of single bits drawn from each attribute's hash.
//! The choice vector decides, per composite bit, which attribute (and which
//! bit of that attribute's hash) contributes.
//!
//! # Design Principles
//!
//! - Bit patterns are fixed-width `u32` values with explicit masks
//! - Truncation to an address width is always an explicit `lower` call
//! - Attribute hashing is deterministic across runs and platforms
//! - The choice vector is immutable once the relation is created

mod bits;
mod chvec;
mod hash;

pub use bits::{bit_is_set, lower, set_bit, to_binary, Bits, HASH_WIDTH};
pub use chvec::{ChVecError, ChVecItem, ChoiceVector};
pub use hash::hash_attribute;
