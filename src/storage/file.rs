//! Page files
//!
//! A page file is a flat array of fixed-size pages addressed by `PageId`.
//! A relation owns two: the data file, whose page ids are bucket ids, and
//! the overflow file. Fetching goes through a shared reference so any
//! number of scans can read one relation; writing requires exclusive
//! access, as does appending.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::page::{Page, PageId, PAGE_SIZE};

/// One open file of pages.
#[derive(Debug)]
pub struct PageFile {
    path: PathBuf,
    file: File,
    npages: u32,
}

impl PageFile {
    /// Creates a new, empty page file. Fails if the path already exists.
    pub fn create(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                StorageError::io_error(format!("failed to create page file {}", path.display()), e)
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            npages: 0,
        })
    }

    /// Opens an existing page file and validates its length.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                StorageError::io_error(format!("failed to open page file {}", path.display()), e)
            })?;
        let len = file
            .metadata()
            .map_err(|e| StorageError::io_error("failed to read page file metadata", e))?
            .len();
        if len % PAGE_SIZE as u64 != 0 {
            return Err(StorageError::corruption(format!(
                "page file {} is {} bytes, not a whole number of pages",
                path.display(),
                len
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            file,
            npages: (len / PAGE_SIZE as u64) as u32,
        })
    }

    /// The page file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of allocated pages.
    pub fn page_count(&self) -> u32 {
        self.npages
    }

    /// Reads and verifies one page.
    ///
    /// Takes a shared reference: concurrent scans over one relation all
    /// fetch through the same handle, each call seeking before it reads.
    pub fn fetch_page(&self, id: PageId) -> StorageResult<Page> {
        if id >= self.npages {
            return Err(StorageError::corruption_at_page(
                id,
                format!("page id out of range, file has {} pages", self.npages),
            ));
        }
        let mut buf = [0u8; PAGE_SIZE];
        let mut handle = &self.file;
        handle
            .seek(SeekFrom::Start(id as u64 * PAGE_SIZE as u64))
            .map_err(|e| StorageError::read_failed(format!("failed to seek to page {}", id), e))?;
        handle
            .read_exact(&mut buf)
            .map_err(|e| StorageError::read_failed(format!("failed to read page {}", id), e))?;
        Page::from_bytes(&buf, id)
    }

    /// Writes one page in place.
    pub fn write_page(&mut self, id: PageId, page: &Page) -> StorageResult<()> {
        if id >= self.npages {
            return Err(StorageError::corruption_at_page(
                id,
                format!("page id out of range, file has {} pages", self.npages),
            ));
        }
        self.write_at(id, page)
    }

    /// Appends one page at the end of the file and returns its id.
    pub fn append_page(&mut self, page: &Page) -> StorageResult<PageId> {
        let id = self.npages;
        self.write_at(id, page)?;
        self.npages += 1;
        Ok(id)
    }

    fn write_at(&mut self, id: PageId, page: &Page) -> StorageResult<()> {
        self.file
            .seek(SeekFrom::Start(id as u64 * PAGE_SIZE as u64))
            .map_err(|e| StorageError::write_failed(format!("failed to seek to page {}", id), e))?;
        self.file
            .write_all(&page.to_bytes())
            .map_err(|e| StorageError::write_failed(format!("failed to write page {}", id), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_open_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.mah");
        {
            let file = PageFile::create(&path).unwrap();
            assert_eq!(file.page_count(), 0);
        }
        let file = PageFile::open(&path).unwrap();
        assert_eq!(file.page_count(), 0);
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.mah");
        PageFile::create(&path).unwrap();
        assert!(PageFile::create(&path).is_err());
    }

    #[test]
    fn test_append_fetch_write_cycle() {
        let dir = TempDir::new().unwrap();
        let mut file = PageFile::create(&dir.path().join("data.mah")).unwrap();

        let mut page = Page::new();
        page.add_tuple(b"1,a");
        assert_eq!(file.append_page(&page).unwrap(), 0);
        assert_eq!(file.append_page(&Page::new()).unwrap(), 1);
        assert_eq!(file.page_count(), 2);

        let mut second = file.fetch_page(1).unwrap();
        assert_eq!(second.ntuples(), 0);
        second.add_tuple(b"2,b");
        file.write_page(1, &second).unwrap();

        let reread = file.fetch_page(1).unwrap();
        assert_eq!(reread.ntuples(), 1);
    }

    #[test]
    fn test_fetch_out_of_range_is_error() {
        let dir = TempDir::new().unwrap();
        let file = PageFile::create(&dir.path().join("data.mah")).unwrap();
        assert!(file.fetch_page(0).is_err());
    }

    #[test]
    fn test_open_rejects_misaligned_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.mah");
        std::fs::write(&path, vec![0u8; PAGE_SIZE + 13]).unwrap();
        let err = PageFile::open(&path).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_on_disk_corruption_detected_on_fetch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.mah");
        {
            let mut file = PageFile::create(&path).unwrap();
            let mut page = Page::new();
            page.add_tuple(b"1,a");
            file.append_page(&page).unwrap();
        }
        // Flip a data byte behind the checksum's back.
        {
            let mut raw = OpenOptions::new().write(true).open(&path).unwrap();
            raw.seek(SeekFrom::Start(100)).unwrap();
            raw.write_all(&[0xFF]).unwrap();
        }
        let file = PageFile::open(&path).unwrap();
        let err = file.fetch_page(0).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.code().code(), "MAH_PAGE_CORRUPTION");
    }
}
