//! Storage Module
//!
//! Dump and load of a whole arena plus the location of its index root.
//!
//! ## Responsibilities
//! - Write every arena page as a fixed-size block
//! - Record where the index root lives (superblock format)
//! - Rebuild an arena and root pointer from either format
//!
//! ## File Formats
//! ```text
//! Raw (no header, no version tag)
//! ┌──────────────┬──────────────┬─────┬──────────────┐
//! │ Page 0 (8K)  │ Page 1 (8K)  │ ... │ Page N (8K)  │
//! └──────────────┴──────────────┴─────┴──────────────┘
//!   root = first allocation of page 0 (0x00000008)
//!
//! Superblock
//! ┌──────────────────────────────────────────────────┐
//! │ Superblock (8K, zero padded)                     │
//! │   Magic "AGIX" (4) | Version u16 (2)             │
//! │   PageSize u32 | PageCount u32 | Root u32        │
//! │   BucketCount u32 | PagesCRC32 u32               │
//! ├──────────────┬──────────────┬─────┬──────────────┤
//! │ Page 0 (8K)  │ Page 1 (8K)  │ ... │ Page N (8K)  │
//! └──────────────┴──────────────┴─────┴──────────────┘
//! ```
//!
//! Both formats keep the file size an exact multiple of the page size. A raw
//! file can never start with the magic since page 0's id is zero.

mod file;
mod superblock;

pub use file::{IndexFile, LoadedIndex};
pub use superblock::Superblock;

/// Magic bytes identifying a superblock index file
pub(crate) const MAGIC: &[u8; 4] = b"AGIX";

/// Current superblock format version
pub(crate) const VERSION: u16 = 1;
