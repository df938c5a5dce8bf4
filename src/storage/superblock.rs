//! Superblock
//!
//! Leading block of a superblock-format index file.

use serde::{Deserialize, Serialize};

use crate::arena::PAGE_SIZE;
use crate::error::{AgrepError, Result};
use crate::index::BUCKET_COUNT;

use super::{MAGIC, VERSION};

/// File header naming the format version, page count and index root
///
/// Encoded with bincode's fixed-int little-endian layout (26 bytes) and
/// zero padded to a full page block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Superblock {
    pub magic: [u8; 4],
    pub version: u16,
    pub page_size: u32,
    pub page_count: u32,
    /// Raw logical pointer of the index root
    pub root: u32,
    pub bucket_count: u32,
    /// CRC32 over every page block, in file order
    pub checksum: u32,
}

impl Superblock {
    pub fn new(page_count: usize, root: u32, checksum: u32) -> Self {
        Self {
            magic: *MAGIC,
            version: VERSION,
            page_size: PAGE_SIZE as u32,
            page_count: page_count as u32,
            root,
            bucket_count: BUCKET_COUNT as u32,
            checksum,
        }
    }

    /// Whether `block` starts with the superblock magic
    pub fn is_superblock(block: &[u8]) -> bool {
        block.starts_with(MAGIC)
    }

    /// Encode as one zero-padded page block
    pub fn to_block(&self) -> Result<Vec<u8>> {
        let mut block = bincode::serialize(self)?;
        block.resize(PAGE_SIZE, 0);
        Ok(block)
    }

    /// Decode and validate everything that does not need the page data
    pub fn from_block(block: &[u8]) -> Result<Self> {
        let sb: Superblock = bincode::deserialize(block)?;

        if &sb.magic != MAGIC {
            return Err(AgrepError::Format(format!("bad superblock magic {:?}", sb.magic)));
        }
        if sb.version != VERSION {
            return Err(AgrepError::Format(format!(
                "unsupported index file version {}",
                sb.version
            )));
        }
        if sb.page_size as usize != PAGE_SIZE {
            return Err(AgrepError::Format(format!(
                "index file uses page size {}, expected {}",
                sb.page_size, PAGE_SIZE
            )));
        }
        if sb.bucket_count as usize != BUCKET_COUNT {
            return Err(AgrepError::Format(format!(
                "index file uses {} buckets, expected {}",
                sb.bucket_count, BUCKET_COUNT
            )));
        }
        if sb.root == 0 {
            return Err(AgrepError::Format("superblock has a null root".to_string()));
        }

        Ok(sb)
    }
}
