//! Tuple subsystem for mahdb
//!
//! A tuple is an ordered list of UTF-8 attribute values with a fixed arity.
//! Its text form is comma-separated (`"1234,john,3.5"`); its stored form is
//! the same bytes, laid back-to-back in a page with a NUL terminator after
//! each record. Values therefore must not contain the separator, the
//! wildcard marker reserved for queries, or NUL.

mod errors;

pub use errors::{TupleError, TupleErrorCode, TupleResult};

use std::fmt;

/// Field separator in the text form.
pub const SEPARATOR: char = ',';

/// The wildcard marker, reserved for query patterns.
pub const WILDCARD: &str = "?";

/// One stored tuple: `nattrs` attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuple {
    values: Vec<String>,
}

impl Tuple {
    /// Parses the text form against a schema arity.
    ///
    /// Rejects arity mismatches and values containing reserved characters.
    pub fn parse(text: &str, nattrs: usize) -> TupleResult<Self> {
        let values: Vec<String> = text.split(SEPARATOR).map(str::to_string).collect();
        if values.len() != nattrs {
            return Err(TupleError::arity_mismatch(nattrs, values.len()));
        }
        // An all-empty single-attribute tuple would encode to zero bytes,
        // indistinguishable from the page terminator.
        if nattrs == 1 && values[0].is_empty() {
            return Err(TupleError::invalid_value("", "encodes to an empty record"));
        }
        for value in &values {
            if value.contains(WILDCARD) {
                return Err(TupleError::invalid_value(value, "contains the wildcard marker"));
            }
            if value.contains('\0') {
                return Err(TupleError::invalid_value(value, "contains NUL"));
            }
        }
        Ok(Self { values })
    }

    /// The attribute values in schema order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of attributes.
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    /// The stored record form: the comma-joined text as UTF-8 bytes,
    /// without the page-level NUL terminator.
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decodes a stored record.
    ///
    /// The bytes are everything between the record start and its NUL
    /// terminator. Non-UTF-8 content means the page is corrupt.
    pub fn decode(record: &[u8]) -> TupleResult<Self> {
        let text = std::str::from_utf8(record)
            .map_err(|e| TupleError::corrupt_record(format!("record is not UTF-8: {}", e)))?;
        Ok(Self {
            values: text.split(SEPARATOR).map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_separator() {
        let t = Tuple::parse("1234,john,3.5", 3).unwrap();
        assert_eq!(t.values(), ["1234", "john", "3.5"]);
        assert_eq!(t.arity(), 3);
    }

    #[test]
    fn test_parse_rejects_arity_mismatch() {
        let err = Tuple::parse("a,b", 3).unwrap_err();
        assert_eq!(err.code().code(), "MAH_TUPLE_ARITY_MISMATCH");
    }

    #[test]
    fn test_parse_rejects_reserved_characters() {
        assert!(Tuple::parse("a,?", 2).is_err());
        assert!(Tuple::parse("a,b\0", 2).is_err());
    }

    #[test]
    fn test_empty_values_are_allowed() {
        let t = Tuple::parse("a,,c", 3).unwrap();
        assert_eq!(t.values()[1], "");
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let err = Tuple::decode(&[0xFF, 0xFE, 0x2C, 0x41]).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_encode_is_text_form() {
        let t = Tuple::parse("5,abc", 2).unwrap();
        assert_eq!(t.encode(), b"5,abc");
        assert_eq!(Tuple::decode(b"5,abc").unwrap(), t);
    }
}
