//! Index files
//!
//! Writes an arena in the configured format and reads either format back.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::arena::{page_count_for, Arena, LogicalPointer, PAGE_SIZE};
use crate::config::FileFormat;
use crate::error::{AgrepError, Result};
use crate::index::ROOT_POINTER;

use super::Superblock;

/// An arena rebuilt from disk, plus where its index root lives
#[derive(Debug)]
pub struct LoadedIndex {
    pub arena: Arena,
    pub root: LogicalPointer,
    /// Layout the file was written in
    pub format: FileFormat,
}

/// Reader/writer for dumped index files
pub struct IndexFile;

impl IndexFile {
    /// Dump `arena` to `path`, replacing any existing file
    ///
    /// The raw format has nowhere to record the root, so it only accepts a
    /// root at the well-known first allocation.
    pub fn write(path: &Path, arena: &Arena, root: LogicalPointer, format: FileFormat) -> Result<()> {
        match format {
            FileFormat::Raw => {
                if root.raw() != ROOT_POINTER {
                    return Err(AgrepError::Format(format!(
                        "raw format needs the root at {:#010x}, found {}",
                        ROOT_POINTER, root
                    )));
                }
                arena.dump(path)
            }
            FileFormat::Superblock => Self::write_with_superblock(path, arena, root),
        }
    }

    /// Load an index file in either format
    pub fn read(path: &Path) -> Result<LoadedIndex> {
        let file = File::open(path)?;
        let blocks = page_count_for(file.metadata()?.len())?;

        let mut reader = BufReader::new(file);
        let mut first = vec![0u8; PAGE_SIZE];
        reader.read_exact(&mut first)?;

        if !Superblock::is_superblock(&first) {
            warn!(path = %path.display(), "No superblock, reading raw page dump");
            drop(reader);
            let arena = Arena::load(path)?;
            let root = LogicalPointer::new(0, ROOT_POINTER as u16);
            return Ok(LoadedIndex {
                arena,
                root,
                format: FileFormat::Raw,
            });
        }

        let sb = Superblock::from_block(&first)?;
        if sb.page_count as usize + 1 != blocks {
            return Err(AgrepError::Format(format!(
                "superblock lists {} pages but the file holds {}",
                sb.page_count,
                blocks - 1
            )));
        }

        let mut hashing = ChecksumReader::new(reader);
        let arena = Arena::read_pages(&mut hashing, sb.page_count as usize)?;

        let checksum = hashing.finalize();
        if checksum != sb.checksum {
            return Err(AgrepError::Format(format!(
                "page checksum mismatch: stored {:#010x}, computed {:#010x}",
                sb.checksum, checksum
            )));
        }

        let root = LogicalPointer::from_raw(sb.root)
            .ok_or_else(|| AgrepError::Format("superblock has a null root".to_string()))?;

        info!(path = %path.display(), pages = sb.page_count, root = %root, "Index file loaded");
        Ok(LoadedIndex {
            arena,
            root,
            format: FileFormat::Superblock,
        })
    }

    /// Placeholder superblock, pages, then seek back for the real superblock
    fn write_with_superblock(path: &Path, arena: &Arena, root: LogicalPointer) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(&vec![0u8; PAGE_SIZE])?;

        let mut hasher = crc32fast::Hasher::new();
        for page in arena.pages() {
            let block = page.to_block();
            hasher.update(&block);
            writer.write_all(&block)?;
        }
        writer.flush()?;

        let sb = Superblock::new(arena.page_count(), root.raw(), hasher.finalize());

        let mut file = writer.into_inner().map_err(|e| AgrepError::Io(e.into_error()))?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&sb.to_block()?)?;
        file.sync_all()?;

        info!(path = %path.display(), pages = arena.page_count(), root = %root, "Index file written");
        Ok(())
    }
}

/// Reader adapter accumulating a CRC32 of everything read through it
struct ChecksumReader<R> {
    inner: R,
    hasher: crc32fast::Hasher,
}

impl<R: Read> ChecksumReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

impl<R: Read> Read for ChecksumReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
