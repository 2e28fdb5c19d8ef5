//! Partial-match scans
//!
//! A scan answers a partially-specified query by visiting only the buckets
//! whose address is consistent with the bits the query determines. The
//! choice vector splits the composite hash into known bits (from specified
//! attributes) and an unknown mask (wildcarded positions); a bucket is a
//! candidate iff its address agrees with the known bits at every known
//! position.
//!
//! Growth complicates the comparison: a bucket below `2^depth` is
//! addressed with `depth` bits, a bucket at or above it with `depth + 1`
//! (it was created by a split), so the expected pattern is the known bits
//! truncated to the matching width.
//!
//! The scan is a plain cursor, not a generator: all state lives in the
//! `Scan` value and advances one `next_tuple` call at a time. Candidate
//! buckets are visited in increasing id order; within a bucket, the
//! primary page first, then the overflow chain; within a page, records in
//! storage order. Every candidate tuple still passes the pattern filter —
//! bucket membership only proves bit agreement, not value equality.

use crate::hashing::{self, Bits};
use crate::relation::Relation;
use crate::storage::PageId;
use crate::tuple::Tuple;

use super::errors::QueryResult;
use super::pattern::QueryPattern;

/// Resumption point of a scan: the bucket being visited, the page within
/// its chain, and the byte offset of the next record in that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    bucket: PageId,
    page: PageId,
    in_ovflow: bool,
    offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning(Cursor),
    Exhausted,
}

/// One partial-match scan over a relation.
///
/// The scan borrows the relation for its whole life, so the relation
/// cannot grow mid-scan; depth and page count are still read through the
/// borrow on every call that needs them, never cached here. Dropping the
/// scan is the only teardown — it releases nothing but the descriptor
/// itself and is safe in every state.
#[derive(Debug)]
pub struct Scan<'r> {
    reln: &'r Relation,
    pattern: QueryPattern,
    known: Bits,
    unknown: Bits,
    state: ScanState,
    buckets_visited: u32,
}

impl<'r> Scan<'r> {
    /// Starts a scan for a query in text form (`"1234,?,abc"`).
    ///
    /// Derives the known bits and unknown mask from the choice vector and
    /// points the cursor at the smallest candidate bucket: the known bits
    /// truncated to `depth`, which is what every unknown bit being zero
    /// addresses. Touches metadata only, never a data page.
    pub fn start(reln: &'r Relation, query: &str) -> QueryResult<Self> {
        let pattern = QueryPattern::parse(query, reln.nattrs())?;
        let (known, unknown) = reln.chvec().partial_hash(pattern.values());
        let first = hashing::lower(known, reln.depth());
        Ok(Self {
            reln,
            pattern,
            known,
            unknown,
            state: ScanState::Scanning(Cursor {
                bucket: first,
                page: first,
                in_ovflow: false,
                offset: 0,
            }),
            buckets_visited: 1,
        })
    }

    /// The pattern this scan filters with.
    pub fn pattern(&self) -> &QueryPattern {
        &self.pattern
    }

    /// Hash bits determined by the query's specified attributes.
    pub fn known_bits(&self) -> Bits {
        self.known
    }

    /// Hash-bit positions left free by wildcards.
    pub fn unknown_mask(&self) -> Bits {
        self.unknown
    }

    /// Number of candidate buckets visited so far.
    pub fn buckets_visited(&self) -> u32 {
        self.buckets_visited
    }

    /// Returns the next matching tuple, or `None` once the scan is done.
    ///
    /// Exhaustion is sticky: after the first `None`, every further call
    /// returns `None` without touching storage. Page fetch and decode
    /// errors propagate unchanged; the cursor keeps its position, so a
    /// retried call re-reads the same page.
    pub fn next_tuple(&mut self) -> QueryResult<Option<Tuple>> {
        let mut cursor = match self.state {
            ScanState::Scanning(cursor) => cursor,
            ScanState::Exhausted => return Ok(None),
        };
        let result = self.pull(&mut cursor);
        self.state = match result {
            Ok(None) => ScanState::Exhausted,
            _ => ScanState::Scanning(cursor),
        };
        result
    }

    /// Advances the cursor to the next matching tuple.
    fn pull(&mut self, cursor: &mut Cursor) -> QueryResult<Option<Tuple>> {
        loop {
            let page = if cursor.in_ovflow {
                self.reln.ovflow_page(cursor.page)?
            } else {
                self.reln.data_page(cursor.page)?
            };

            // Records left in the current page.
            while let Some((record, next)) = page.tuple_at(cursor.offset) {
                cursor.offset = next;
                let tuple = Tuple::decode(record)?;
                if self.pattern.matches(&tuple) {
                    return Ok(Some(tuple));
                }
            }

            // Page done: follow the chain, then move buckets.
            if let Some(ov_id) = page.ovflow() {
                cursor.page = ov_id;
                cursor.in_ovflow = true;
                cursor.offset = 0;
            } else if let Some(bucket) = self.next_bucket(cursor.bucket) {
                cursor.bucket = bucket;
                cursor.page = bucket;
                cursor.in_ovflow = false;
                cursor.offset = 0;
                self.buckets_visited += 1;
            } else {
                return Ok(None);
            }
        }
    }

    /// The smallest candidate bucket after `after`, if any.
    ///
    /// A candidate must agree with the known bits at every known position,
    /// compared at the width its id implies: `depth` bits below the split
    /// boundary `2^depth`, `depth + 1` at or above it.
    fn next_bucket(&self, after: PageId) -> Option<PageId> {
        let depth = self.reln.depth();
        let npages = self.reln.npages();
        let boundary: u32 = 1 << depth;
        let mut bucket = after + 1;
        while bucket < npages {
            let width = if bucket < boundary { depth } else { depth + 1 };
            if (bucket & !self.unknown) == hashing::lower(self.known, width) {
                return Some(bucket);
            }
            bucket += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tuple(text: &str, nattrs: usize) -> Tuple {
        Tuple::parse(text, nattrs).unwrap()
    }

    fn collect(scan: &mut Scan<'_>) -> Vec<Tuple> {
        let mut out = Vec::new();
        while let Some(t) = scan.next_tuple().unwrap() {
            out.push(t);
        }
        out
    }

    #[test]
    fn test_empty_relation_exhausts_immediately() {
        let dir = TempDir::new().unwrap();
        let reln = Relation::create(dir.path(), "r", 2, 4, None).unwrap();
        let mut scan = Scan::start(&reln, "?,?").unwrap();
        assert!(scan.next_tuple().unwrap().is_none());
        // Sticky: asking again stays at end-of-scan.
        assert!(scan.next_tuple().unwrap().is_none());
    }

    #[test]
    fn test_start_rejects_arity_mismatch() {
        let dir = TempDir::new().unwrap();
        let reln = Relation::create(dir.path(), "r", 2, 4, None).unwrap();
        let err = Scan::start(&reln, "a,b,c").unwrap_err();
        assert_eq!(err.code().code(), "MAH_QUERY_SCHEMA_MISMATCH");
    }

    #[test]
    fn test_known_bits_follow_choice_vector() {
        let dir = TempDir::new().unwrap();
        let reln = Relation::create(dir.path(), "r", 2, 4, None).unwrap();
        let scan = Scan::start(&reln, "5,?").unwrap();

        let pattern = QueryPattern::parse("5,?", 2).unwrap();
        let (known, unknown) = reln.chvec().partial_hash(pattern.values());
        assert_eq!(scan.known_bits(), known);
        assert_eq!(scan.unknown_mask(), unknown);
    }

    #[test]
    fn test_full_wildcard_visits_every_bucket() {
        let dir = TempDir::new().unwrap();
        let mut reln = Relation::create(dir.path(), "r", 2, 4, None).unwrap();
        for i in 0..20 {
            reln.insert(&tuple(&format!("k{},v{}", i, i), 2)).unwrap();
        }
        let mut scan = Scan::start(&reln, "?,?").unwrap();
        let results = collect(&mut scan);
        assert_eq!(results.len(), 20);
        assert_eq!(scan.buckets_visited(), 4);
    }

    #[test]
    fn test_filter_applies_inside_candidate_bucket() {
        let dir = TempDir::new().unwrap();
        let mut reln = Relation::create(dir.path(), "r", 2, 1, None).unwrap();
        // One bucket: everything is a candidate, so only the filter
        // separates matches from the rest.
        reln.insert(&tuple("5,abc", 2)).unwrap();
        reln.insert(&tuple("6,abc", 2)).unwrap();
        reln.insert(&tuple("5,def", 2)).unwrap();

        let mut scan = Scan::start(&reln, "5,?").unwrap();
        let results = collect(&mut scan);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|t| t.values()[0] == "5"));
    }

    #[test]
    fn test_independent_scans_coexist() {
        let dir = TempDir::new().unwrap();
        let mut reln = Relation::create(dir.path(), "r", 2, 2, None).unwrap();
        for i in 0..10 {
            reln.insert(&tuple(&format!("k{},v", i), 2)).unwrap();
        }
        let mut a = Scan::start(&reln, "?,?").unwrap();
        let mut b = Scan::start(&reln, "?,?").unwrap();

        // Interleave: each cursor advances on its own.
        let first_a = a.next_tuple().unwrap().unwrap();
        let first_b = b.next_tuple().unwrap().unwrap();
        assert_eq!(first_a, first_b);

        assert_eq!(collect(&mut a).len(), 9);
        assert_eq!(collect(&mut b).len(), 9);
    }
}
