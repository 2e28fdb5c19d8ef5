//! Relation lifecycle, insertion and linear-hash growth
//!
//! A relation is a directory holding the metadata document and two page
//! files: `data.mah` (primary bucket pages, page id = bucket id) and
//! `ovflow.mah` (overflow pages). Insertion addresses a bucket with the
//! composite hash; the file grows one bucket at a time, splitting the
//! bucket under the split pointer after every `split_every` inserts.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::hashing::{self, Bits, ChoiceVector, HASH_WIDTH};
use crate::storage::{Page, PageFile, PageId, PAGE_DATA_SIZE};
use crate::tuple::Tuple;

use super::errors::{RelnError, RelnResult};
use super::meta::{RelationMeta, META_FILE};

/// File name of the primary bucket pages.
pub const DATA_FILE: &str = "data.mah";

/// File name of the overflow pages.
pub const OVFLOW_FILE: &str = "ovflow.mah";

/// An open multi-attribute linear-hashed relation.
#[derive(Debug)]
pub struct Relation {
    dir: PathBuf,
    meta: RelationMeta,
    data: PageFile,
    ovflow: PageFile,
}

impl Relation {
    /// Creates a new relation under `dir`.
    ///
    /// `npages` is the initial bucket count and must be a power of two
    /// (`depth` starts as its log2, the split pointer at zero). The choice
    /// vector description is optional; see
    /// [`ChoiceVector::parse`](crate::hashing::ChoiceVector::parse).
    pub fn create(
        dir: &Path,
        name: &str,
        nattrs: usize,
        npages: u32,
        chvec_spec: Option<&str>,
    ) -> RelnResult<Self> {
        if nattrs == 0 {
            return Err(RelnError::bad_params("relation arity must be at least 1"));
        }
        if npages == 0 || !npages.is_power_of_two() {
            return Err(RelnError::bad_params(format!(
                "initial page count must be a power of two, got {}",
                npages
            )));
        }
        if dir.join(META_FILE).exists() {
            return Err(RelnError::exists(dir.display()));
        }
        fs::create_dir_all(dir)
            .map_err(|e| RelnError::bad_params(format!("cannot create {}: {}", dir.display(), e)))?;

        let chvec = match chvec_spec {
            Some(spec) => ChoiceVector::parse(spec, nattrs)?,
            None => ChoiceVector::default_for(nattrs),
        };

        let mut data = PageFile::create(&dir.join(DATA_FILE))?;
        let ovflow = PageFile::create(&dir.join(OVFLOW_FILE))?;
        for _ in 0..npages {
            data.append_page(&Page::new())?;
        }

        let meta = RelationMeta {
            name: name.to_string(),
            nattrs,
            depth: npages.trailing_zeros() as u8,
            splitp: 0,
            npages,
            ntuples: 0,
            split_every: (PAGE_DATA_SIZE / (10 * nattrs)).max(1) as u64,
            chvec,
            created_at: Utc::now(),
        };
        meta.save(dir)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            meta,
            data,
            ovflow,
        })
    }

    /// Opens an existing relation and cross-checks metadata against the
    /// page files.
    pub fn open(dir: &Path) -> RelnResult<Self> {
        let meta = RelationMeta::load(dir)?;
        let data = PageFile::open(&dir.join(DATA_FILE))?;
        let ovflow = PageFile::open(&dir.join(OVFLOW_FILE))?;
        if data.page_count() != meta.npages {
            return Err(RelnError::meta_invalid(format!(
                "metadata says {} bucket pages, data file holds {}",
                meta.npages,
                data.page_count()
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            meta,
            data,
            ovflow,
        })
    }

    /// Relation name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Relation directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of attributes per tuple.
    pub fn nattrs(&self) -> usize {
        self.meta.nattrs
    }

    /// Current global address-bit depth.
    pub fn depth(&self) -> u8 {
        self.meta.depth
    }

    /// The split pointer: buckets below it already use `depth + 1` bits.
    pub fn splitp(&self) -> u32 {
        self.meta.splitp
    }

    /// Allocated primary bucket count.
    pub fn npages(&self) -> u32 {
        self.meta.npages
    }

    /// Allocated overflow page count.
    pub fn novflow_pages(&self) -> u32 {
        self.ovflow.page_count()
    }

    /// Stored tuple count.
    pub fn ntuples(&self) -> u64 {
        self.meta.ntuples
    }

    /// Inserts per split step.
    pub fn split_every(&self) -> u64 {
        self.meta.split_every
    }

    /// The relation's choice vector.
    pub fn chvec(&self) -> &ChoiceVector {
        &self.meta.chvec
    }

    /// Fetches one primary bucket page.
    pub fn data_page(&self, id: PageId) -> RelnResult<Page> {
        Ok(self.data.fetch_page(id)?)
    }

    /// Fetches one overflow page.
    pub fn ovflow_page(&self, id: PageId) -> RelnResult<Page> {
        Ok(self.ovflow.fetch_page(id)?)
    }

    /// The bucket a composite hash addresses under the current depth and
    /// split pointer: `depth` low bits, or `depth + 1` for buckets that
    /// have already split.
    pub fn bucket_for(&self, composite: Bits) -> PageId {
        let bucket = hashing::lower(composite, self.meta.depth);
        if bucket < self.meta.splitp {
            hashing::lower(composite, self.meta.depth + 1)
        } else {
            bucket
        }
    }

    /// Inserts one tuple.
    ///
    /// Splits the bucket under the split pointer first whenever the stored
    /// tuple count has reached a multiple of the split cadence, so the file
    /// grows one bucket at a time ahead of the data.
    pub fn insert(&mut self, tuple: &Tuple) -> RelnResult<()> {
        if tuple.arity() != self.meta.nattrs {
            return Err(RelnError::arity_mismatch(self.meta.nattrs, tuple.arity()));
        }
        let record = tuple.encode();
        if record.len() + 1 > PAGE_DATA_SIZE {
            return Err(RelnError::tuple_too_large(record.len() + 1, PAGE_DATA_SIZE));
        }

        if self.meta.ntuples > 0 && self.meta.ntuples % self.meta.split_every == 0 {
            self.split()?;
        }

        let composite = self.meta.chvec.composite_hash(tuple.values());
        let bucket = self.bucket_for(composite);
        self.add_to_bucket(bucket, &record, &mut Vec::new())?;

        self.meta.ntuples += 1;
        self.meta.save(&self.dir)?;
        Ok(())
    }

    /// Adds one record to a bucket: the primary page if it fits, else the
    /// first overflow page with room, else a page linked at the chain tail
    /// (drawn from `reuse` before the overflow file grows).
    fn add_to_bucket(
        &mut self,
        bucket: PageId,
        record: &[u8],
        reuse: &mut Vec<PageId>,
    ) -> RelnResult<()> {
        let mut tail = self.data.fetch_page(bucket)?;
        if tail.add_tuple(record) {
            self.data.write_page(bucket, &tail)?;
            return Ok(());
        }

        let mut tail_id = bucket;
        let mut tail_in_ovflow = false;
        while let Some(ov_id) = tail.ovflow() {
            let mut ov = self.ovflow.fetch_page(ov_id)?;
            if ov.add_tuple(record) {
                self.ovflow.write_page(ov_id, &ov)?;
                return Ok(());
            }
            tail = ov;
            tail_id = ov_id;
            tail_in_ovflow = true;
        }

        let mut fresh = Page::new();
        let added = fresh.add_tuple(record);
        debug_assert!(added);
        let new_id = match reuse.pop() {
            Some(id) => {
                self.ovflow.write_page(id, &fresh)?;
                id
            }
            None => self.ovflow.append_page(&fresh)?,
        };

        tail.set_ovflow(new_id);
        if tail_in_ovflow {
            self.ovflow.write_page(tail_id, &tail)?;
        } else {
            self.data.write_page(tail_id, &tail)?;
        }
        Ok(())
    }

    /// Splits the bucket under the split pointer.
    ///
    /// Appends the image bucket `splitp + 2^depth`, re-addresses every
    /// record of the old chain with one more bit, and advances the split
    /// pointer; when it wraps, the depth increases. The old chain's
    /// overflow pages are reused before the overflow file grows.
    fn split(&mut self) -> RelnResult<()> {
        if self.meta.depth as usize >= HASH_WIDTH - 1 {
            // Address space exhausted; growth continues in overflow chains.
            return Ok(());
        }
        let old = self.meta.splitp;

        let mut records: Vec<Vec<u8>> = Vec::new();
        let mut reuse: Vec<PageId> = Vec::new();
        let mut page = self.data.fetch_page(old)?;
        loop {
            let mut offset = 0;
            while let Some((record, next)) = page.tuple_at(offset) {
                records.push(record.to_vec());
                offset = next;
            }
            match page.ovflow() {
                Some(ov_id) => {
                    reuse.push(ov_id);
                    page = self.ovflow.fetch_page(ov_id)?;
                }
                None => break,
            }
        }

        self.data.write_page(old, &Page::new())?;
        let new_bucket = self.data.append_page(&Page::new())?;
        debug_assert_eq!(new_bucket, self.meta.npages);
        self.meta.npages += 1;

        let width = self.meta.depth + 1;
        for record in records {
            let tuple = Tuple::decode(&record)?;
            let composite = self.meta.chvec.composite_hash(tuple.values());
            let dest = hashing::lower(composite, width);
            debug_assert!(dest == old || dest == new_bucket);
            self.add_to_bucket(dest, &record, &mut reuse)?;
        }

        self.meta.splitp += 1;
        if self.meta.splitp == 1u32 << self.meta.depth {
            self.meta.depth += 1;
            self.meta.splitp = 0;
        }
        Ok(())
    }
}
