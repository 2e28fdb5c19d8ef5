//! Relation metadata
//!
//! Everything a scan or an insert needs to interpret the page files:
//! arity, the linear-hashing state (depth, split pointer, page count), the
//! split cadence and the choice vector. Persisted as a JSON document next
//! to the page files, rewritten atomically via temp-file rename.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::{ChoiceVector, HASH_WIDTH};

use super::errors::{RelnError, RelnResult};

/// File name of the metadata document inside a relation directory.
pub const META_FILE: &str = "meta.json";

/// The persistent parameters of one relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationMeta {
    /// Relation name (informational; the directory is the identity)
    pub name: String,
    /// Number of attributes per tuple
    pub nattrs: usize,
    /// Current global address-bit depth
    pub depth: u8,
    /// Split pointer: the next bucket to split
    pub splitp: u32,
    /// Allocated primary bucket pages
    pub npages: u32,
    /// Stored tuple count
    pub ntuples: u64,
    /// One bucket splits after every `split_every` inserts
    pub split_every: u64,
    /// The choice vector fixed at creation
    pub chvec: ChoiceVector,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl RelationMeta {
    /// Loads and validates the metadata document from a relation directory.
    pub fn load(dir: &Path) -> RelnResult<Self> {
        let path = dir.join(META_FILE);
        if !path.exists() {
            return Err(RelnError::not_found(dir.display()));
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| RelnError::meta_invalid(format!("failed to read {}: {}", path.display(), e)))?;
        let meta: Self = serde_json::from_str(&text)
            .map_err(|e| RelnError::meta_invalid(format!("malformed metadata document: {}", e)))?;
        meta.validate()?;
        Ok(meta)
    }

    /// Persists the metadata document atomically (write temp, rename).
    pub fn save(&self, dir: &Path) -> RelnResult<()> {
        let path = dir.join(META_FILE);
        let tmp = dir.join(format!("{}.tmp", META_FILE));
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| RelnError::meta_invalid(format!("failed to serialise metadata: {}", e)))?;
        fs::write(&tmp, text)
            .map_err(|e| RelnError::meta_invalid(format!("failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .map_err(|e| RelnError::meta_invalid(format!("failed to replace {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Checks the linear-hashing invariants the rest of the system relies
    /// on: `splitp < 2^depth` and `npages == 2^depth + splitp`.
    pub fn validate(&self) -> RelnResult<()> {
        if self.nattrs == 0 {
            return Err(RelnError::meta_invalid("relation arity is zero"));
        }
        if (self.depth as usize) >= HASH_WIDTH {
            return Err(RelnError::meta_invalid(format!(
                "depth {} exceeds the hash width",
                self.depth
            )));
        }
        if self.split_every == 0 {
            return Err(RelnError::meta_invalid("split cadence is zero"));
        }
        if !self.chvec.is_valid_for(self.nattrs) {
            return Err(RelnError::meta_invalid(
                "choice vector does not fit the relation arity",
            ));
        }
        let half = 1u64 << self.depth;
        if (self.splitp as u64) >= half {
            return Err(RelnError::meta_invalid(format!(
                "split pointer {} is outside the depth-{} half",
                self.splitp, self.depth
            )));
        }
        if self.npages as u64 != half + self.splitp as u64 {
            return Err(RelnError::meta_invalid(format!(
                "page count {} disagrees with depth {} and split pointer {}",
                self.npages, self.depth, self.splitp
            )));
        }
        Ok(())
    }
}
