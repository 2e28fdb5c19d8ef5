//! Query patterns
//!
//! A query names one value per attribute, `?` standing for "any". The
//! pattern drives two things: the known/unknown bit derivation that bounds
//! which buckets a scan visits, and the final per-attribute filter every
//! candidate tuple must pass. The filter is mandatory even after hash
//! filtering — bit agreement does not imply value equality, and wildcard
//! positions were never constrained.

use std::fmt;

use crate::tuple::{Tuple, SEPARATOR, WILDCARD};

use super::errors::{QueryError, QueryResult};

/// A parsed query: one entry per attribute, `None` for the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPattern {
    values: Vec<Option<String>>,
}

impl QueryPattern {
    /// Parses the text form (`"1234,?,abc"`) against a schema arity.
    pub fn parse(text: &str, nattrs: usize) -> QueryResult<Self> {
        let values: Vec<Option<String>> = text
            .split(SEPARATOR)
            .map(|v| {
                if v == WILDCARD {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect();
        if values.len() != nattrs {
            return Err(QueryError::schema_mismatch(nattrs, values.len()));
        }
        Ok(Self { values })
    }

    /// The per-attribute values, `None` at wildcard positions.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Number of attributes.
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    /// Whether every attribute is wildcarded (the full-scan query).
    pub fn is_unconstrained(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// The match filter: every position must be wildcarded or equal.
    pub fn matches(&self, tuple: &Tuple) -> bool {
        if tuple.arity() != self.values.len() {
            return false;
        }
        self.values
            .iter()
            .zip(tuple.values())
            .all(|(pattern, value)| match pattern {
                Some(expected) => expected == value,
                None => true,
            })
    }
}

impl fmt::Display for QueryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            match value {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "{}", WILDCARD)?,
            }
        }
        Ok(())
    }
}
