//! Arena allocator
//!
//! Owns the page table and hands out logical pointers. Memory only grows:
//! the last page is the only one that takes new allocations.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{AgrepError, Result};

use super::{LogicalPointer, Page, MAX_PAYLOAD, PAGE_SIZE};

/// Page-based memory arena
///
/// Page ids are dense and equal to their index in `pages`, so the vector
/// doubles as the id-ordered page table.
#[derive(Debug, Default)]
pub struct Arena {
    pages: Vec<Page>,
}

impl Arena {
    /// Create an empty arena (no pages until the first allocation)
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Reserve `size` bytes and return their address
    ///
    /// Allocations never span pages. When the active page is too full a new
    /// page with the next id is appended and used instead.
    pub fn alloc(&mut self, size: usize) -> Result<LogicalPointer> {
        if size > MAX_PAYLOAD {
            return Err(AgrepError::CapacityExceeded {
                requested: size,
                max: MAX_PAYLOAD,
            });
        }

        if let Some(ptr) = self.pages.last_mut().and_then(|page| page.allocate(size)) {
            return Ok(ptr);
        }

        let page = self.append_page()?;
        // A fresh page always fits MAX_PAYLOAD
        page.allocate(size).ok_or(AgrepError::CapacityExceeded {
            requested: size,
            max: MAX_PAYLOAD,
        })
    }

    /// Bytes of the record at `ptr`
    pub fn get(&self, ptr: LogicalPointer) -> Result<&[u8]> {
        self.page(ptr)?.read(ptr)
    }

    /// Overwrite the record at `ptr`; `bytes` must match the reserved size
    pub fn set(&mut self, ptr: LogicalPointer, bytes: &[u8]) -> Result<()> {
        self.pages
            .get_mut(ptr.page_id() as usize)
            .ok_or(AgrepError::InvalidAddress(ptr.raw()))?
            .write(ptr, bytes)
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of records allocated across all pages
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(Page::slot_count).sum()
    }

    /// Pages in ascending id order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// The page currently taking allocations
    pub fn active_page(&self) -> Option<&Page> {
        self.pages.last()
    }

    /// Snapshot of page usage
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            page_size: PAGE_SIZE,
            page_count: self.pages.len(),
            free_bytes: self.pages.iter().map(Page::free_space).collect(),
        }
    }

    // =========================================================================
    // Block I/O
    // =========================================================================

    /// Write every page as a fixed-size block, ascending id, no separators
    pub fn write_pages<W: Write>(&self, writer: &mut W) -> Result<()> {
        for page in &self.pages {
            writer.write_all(&page.to_block())?;
        }
        Ok(())
    }

    /// Rebuild an arena from `count` consecutive page blocks
    ///
    /// Block `i` must carry page id `i`. The last page read becomes the
    /// active page.
    pub fn read_pages<R: Read>(reader: &mut R, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(AgrepError::Format("no page blocks to read".to_string()));
        }
        if count > u16::MAX as usize + 1 {
            return Err(AgrepError::Format(format!(
                "{} page blocks exceed the 16-bit page id space",
                count
            )));
        }

        let mut pages = Vec::with_capacity(count);
        let mut block = vec![0u8; PAGE_SIZE];

        for expected_id in 0..count {
            reader.read_exact(&mut block).map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    AgrepError::Format(format!("truncated page block {}", expected_id))
                }
                _ => AgrepError::Io(e),
            })?;

            let page = Page::from_block(&block)?;
            if page.id() as usize != expected_id {
                return Err(AgrepError::Format(format!(
                    "block {} carries page id {}",
                    expected_id,
                    page.id()
                )));
            }
            pages.push(page);
        }

        Ok(Self { pages })
    }

    /// Dump all pages to `path`, replacing any existing file
    pub fn dump(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        self.write_pages(&mut writer)?;
        writer.flush()?;

        info!(path = %path.display(), pages = self.pages.len(), "Arena dumped");
        Ok(())
    }

    /// Build a new arena from a file written by [`Arena::dump`]
    ///
    /// The file size must be a positive exact multiple of `PAGE_SIZE`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let count = page_count_for(file.metadata()?.len())?;

        let arena = Self::read_pages(&mut BufReader::new(file), count)?;

        info!(path = %path.display(), pages = count, "Arena loaded");
        Ok(arena)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn page(&self, ptr: LogicalPointer) -> Result<&Page> {
        self.pages
            .get(ptr.page_id() as usize)
            .ok_or(AgrepError::InvalidAddress(ptr.raw()))
    }

    fn append_page(&mut self) -> Result<&mut Page> {
        let id = match self.pages.last() {
            None => 0,
            Some(last) => last.id().checked_add(1).ok_or(AgrepError::ArenaFull(last.id()))?,
        };

        debug!(page_id = id, "Appending arena page");
        self.pages.push(Page::new(id));

        let last = self.pages.len() - 1;
        Ok(&mut self.pages[last])
    }
}

/// Number of page blocks in a file of `len` bytes
pub(crate) fn page_count_for(len: u64) -> Result<usize> {
    if len == 0 || len % PAGE_SIZE as u64 != 0 {
        return Err(AgrepError::Format(format!(
            "file size {} is not a positive multiple of the page size {}",
            len, PAGE_SIZE
        )));
    }
    Ok((len / PAGE_SIZE as u64) as usize)
}

// =============================================================================
// Memory Stats
// =============================================================================

/// Diagnostic view of arena usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    /// Size of one page in bytes
    pub page_size: usize,
    /// Number of allocated pages
    pub page_count: usize,
    /// Free bytes left on each page, by page id
    pub free_bytes: Vec<usize>,
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--Memory Allocator Stats---")?;
        writeln!(f, "  Memory Block (Page) Size: {}", self.page_size)?;
        writeln!(f, "  Number of allocated pages: {}", self.page_count)?;
        writeln!(f)?;
        writeln!(f, "  Page space utilization:")?;
        for (id, free) in self.free_bytes.iter().enumerate() {
            writeln!(f, "    * Page {} - free space: {} bytes", id, free)?;
        }
        write!(f, "---------------------------")
    }
}
