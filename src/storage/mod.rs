//! Page storage subsystem for mahdb
//!
//! Disk-resident fixed-size pages holding NUL-terminated tuple records,
//! organised into two files per relation: primary bucket pages (page id =
//! bucket id) and overflow pages chained off them.
//!
//! # Design Principles
//!
//! - Fixed 1 KiB pages, explicit little-endian header fields
//! - Checksum-verified on every read, halt on corruption
//! - Overflow chains are singly-linked lists of page ids
//! - Fetching needs only a shared reference; mutation is exclusive

mod checksum;
mod errors;
mod file;
mod page;

pub use checksum::{page_checksum, verify_page_checksum};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use file::PageFile;
pub use page::{Page, PageId, NO_PAGE, PAGE_DATA_SIZE, PAGE_HEADER_SIZE, PAGE_SIZE};
