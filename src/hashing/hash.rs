//! Attribute hashing
//!
//! Every attribute value hashes to a full 32-bit pattern; the choice vector
//! then selects single bits out of these patterns to form composite hashes.
//! CRC32 (IEEE polynomial) is used because it is deterministic across runs
//! and platforms, which bucket addressing depends on.

use super::bits::Bits;

/// Hashes one attribute value to a full-width bit pattern.
pub fn hash_attribute(value: &str) -> Bits {
    crc32fast::hash(value.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash_attribute("1234"), hash_attribute("1234"));
    }

    #[test]
    fn test_hash_separates_values() {
        // Not a collision-resistance claim, just a sanity check that
        // distinct common values land on distinct patterns.
        assert_ne!(hash_attribute("john"), hash_attribute("jane"));
        assert_ne!(hash_attribute(""), hash_attribute("0"));
    }
}
