//! Choice vectors
//!
//! A choice vector is a fixed-length sequence of `HASH_WIDTH` entries, one
//! per composite hash bit. Entry `i` names an attribute and a bit position:
//! composite bit `i` is that bit of that attribute's hash. The vector is
//! fixed at relation creation and persists inside the relation metadata.
//!
//! Two derivations are built on it:
//!
//! - `composite_hash` — the insertion-side hash of a full tuple
//! - `partial_hash` — the query-side split into known bits (attributes the
//!   query specifies) and an unknown mask (wildcarded positions)

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bits::{self, Bits, HASH_WIDTH};
use super::hash::hash_attribute;

/// One choice vector entry: composite bit `i` is bit `bit` of attribute
/// `att`'s hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChVecItem {
    /// Attribute index within the relation schema
    pub att: usize,
    /// Bit position within that attribute's hash
    pub bit: usize,
}

/// A relation's choice vector, always `HASH_WIDTH` entries long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceVector {
    items: Vec<ChVecItem>,
}

impl ChoiceVector {
    /// The default vector: composite bit `i` draws on attribute
    /// `i % nattrs`, bit `i / nattrs`, cycling through the schema so every
    /// attribute contributes evenly.
    pub fn default_for(nattrs: usize) -> Self {
        debug_assert!(nattrs >= 1);
        let items = (0..HASH_WIDTH)
            .map(|i| ChVecItem {
                att: i % nattrs,
                bit: i / nattrs,
            })
            .collect();
        Self { items }
    }

    /// Parses a creation-time description such as `"0,1:1,0:0,2"`.
    ///
    /// Each `att,bit` pair fixes one composite bit, low bits first. Up to
    /// `HASH_WIDTH` pairs may be given; the remaining positions are filled
    /// with the default cycling pattern. The empty string yields the pure
    /// default vector.
    pub fn parse(spec: &str, nattrs: usize) -> Result<Self, ChVecError> {
        if nattrs == 0 {
            return Err(ChVecError::new("relation arity must be at least 1"));
        }
        let mut cv = Self::default_for(nattrs);
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(cv);
        }

        let pairs: Vec<&str> = spec.split(':').collect();
        if pairs.len() > HASH_WIDTH {
            return Err(ChVecError::new(format!(
                "choice vector has {} entries, maximum is {}",
                pairs.len(),
                HASH_WIDTH
            )));
        }
        for (i, pair) in pairs.iter().enumerate() {
            let (att, bit) = pair
                .split_once(',')
                .ok_or_else(|| ChVecError::new(format!("entry {} is not an att,bit pair: {:?}", i, pair)))?;
            let att: usize = att
                .trim()
                .parse()
                .map_err(|_| ChVecError::new(format!("entry {} has a non-numeric attribute: {:?}", i, pair)))?;
            let bit: usize = bit
                .trim()
                .parse()
                .map_err(|_| ChVecError::new(format!("entry {} has a non-numeric bit: {:?}", i, pair)))?;
            if att >= nattrs {
                return Err(ChVecError::new(format!(
                    "entry {} names attribute {} but the relation has {} attributes",
                    i, att, nattrs
                )));
            }
            if bit >= HASH_WIDTH {
                return Err(ChVecError::new(format!(
                    "entry {} names hash bit {} but hashes are {} bits wide",
                    i, bit, HASH_WIDTH
                )));
            }
            cv.items[i] = ChVecItem { att, bit };
        }
        Ok(cv)
    }

    /// Checks a vector loaded from metadata against a relation arity.
    pub fn is_valid_for(&self, nattrs: usize) -> bool {
        self.items.len() == HASH_WIDTH
            && self
                .items
                .iter()
                .all(|item| item.att < nattrs && item.bit < HASH_WIDTH)
    }

    /// The entries, low composite bit first.
    pub fn items(&self) -> &[ChVecItem] {
        &self.items
    }

    /// The insertion-side composite hash of a full tuple: every bit `i` of
    /// the result is bit `items[i].bit` of attribute `items[i].att`'s hash.
    pub fn composite_hash(&self, values: &[String]) -> Bits {
        let hashes: Vec<Bits> = values.iter().map(|v| hash_attribute(v)).collect();
        let mut composite: Bits = 0;
        for (i, item) in self.items.iter().enumerate() {
            debug_assert!(item.att < values.len());
            if bits::bit_is_set(hashes[item.att], item.bit) {
                composite = bits::set_bit(composite, i);
            }
        }
        composite
    }

    /// The query-side derivation: returns `(known, unknown)`.
    ///
    /// A composite bit whose source attribute the query specifies is known,
    /// and carries the corresponding bit of that attribute's hash. Every
    /// other position (wildcarded attributes, and positions beyond the
    /// vector) reads as unknown: `unknown` is the complement of the
    /// known-position mask.
    pub fn partial_hash(&self, values: &[Option<String>]) -> (Bits, Bits) {
        let hashes: Vec<Option<Bits>> = values
            .iter()
            .map(|v| v.as_deref().map(hash_attribute))
            .collect();
        let mut known: Bits = 0;
        let mut known_positions: Bits = 0;
        for (i, item) in self.items.iter().enumerate() {
            debug_assert!(item.att < values.len());
            if let Some(h) = hashes[item.att] {
                known_positions = bits::set_bit(known_positions, i);
                if bits::bit_is_set(h, item.bit) {
                    known = bits::set_bit(known, i);
                }
            }
        }
        (known, !known_positions)
    }
}

impl fmt::Display for ChoiceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{},{}", item.att, item.bit)?;
        }
        Ok(())
    }
}

/// Choice vector description error, raised at relation creation.
#[derive(Debug)]
pub struct ChVecError {
    message: String,
}

impl ChVecError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error code string.
    pub fn code(&self) -> &'static str {
        "MAH_CHVEC_INVALID"
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ChVecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)
    }
}

impl std::error::Error for ChVecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cycles_attributes() {
        let cv = ChoiceVector::default_for(2);
        assert_eq!(cv.items()[0], ChVecItem { att: 0, bit: 0 });
        assert_eq!(cv.items()[1], ChVecItem { att: 1, bit: 0 });
        assert_eq!(cv.items()[2], ChVecItem { att: 0, bit: 1 });
        assert_eq!(cv.items()[3], ChVecItem { att: 1, bit: 1 });
        assert_eq!(cv.items().len(), HASH_WIDTH);
    }

    #[test]
    fn test_parse_empty_is_default() {
        let cv = ChoiceVector::parse("", 3).unwrap();
        assert_eq!(cv, ChoiceVector::default_for(3));
    }

    #[test]
    fn test_parse_overrides_prefix_only() {
        let cv = ChoiceVector::parse("1,5:0,9", 2).unwrap();
        assert_eq!(cv.items()[0], ChVecItem { att: 1, bit: 5 });
        assert_eq!(cv.items()[1], ChVecItem { att: 0, bit: 9 });
        // Position 2 onward keeps the default pattern.
        assert_eq!(cv.items()[2], ChVecItem { att: 0, bit: 1 });
    }

    #[test]
    fn test_parse_rejects_bad_attribute() {
        assert!(ChoiceVector::parse("2,0", 2).is_err());
        assert!(ChoiceVector::parse("0,32", 2).is_err());
        assert!(ChoiceVector::parse("0;1", 2).is_err());
        assert!(ChoiceVector::parse("x,1", 2).is_err());
    }

    #[test]
    fn test_composite_matches_partial_on_full_pattern() {
        let cv = ChoiceVector::default_for(2);
        let values = vec!["1234".to_string(), "john".to_string()];
        let pattern: Vec<Option<String>> = values.iter().cloned().map(Some).collect();

        let composite = cv.composite_hash(&values);
        let (known, unknown) = cv.partial_hash(&pattern);

        // A fully specified pattern knows every composite bit.
        assert_eq!(unknown, 0);
        assert_eq!(known, composite);
    }

    #[test]
    fn test_partial_hash_wildcard_positions() {
        // Bit 0 from attribute 0, bit 1 from attribute 1, then cycling.
        let cv = ChoiceVector::default_for(2);
        let pattern = vec![Some("5".to_string()), None];
        let (known, unknown) = cv.partial_hash(&pattern);

        // Odd composite bits draw on the wildcarded attribute 1.
        assert_eq!(unknown, 0xAAAA_AAAA);
        // Known bits agree with attribute 0's hash, spread over even positions.
        let h = hash_attribute("5");
        for i in (0..HASH_WIDTH).step_by(2) {
            assert_eq!(bits::bit_is_set(known, i), bits::bit_is_set(h, i / 2));
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let cv = ChoiceVector::parse("1,3:0,7", 2).unwrap();
        let reparsed = ChoiceVector::parse(&cv.to_string(), 2).unwrap();
        assert_eq!(cv, reparsed);
    }
}
