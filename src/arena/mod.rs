//! Arena Module
//!
//! Simulated heap memory inside fixed-size pages.
//!
//! ## Responsibilities
//! - Hand out logical pointers (page id + slot offset) for new records
//! - Grow by appending pages; never free
//! - Resolve logical pointers back to record bytes
//! - Serialize every page as a fixed-size block and rebuild from blocks
//!
//! ## Page Layout
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Header (8 bytes)                                     │
//! │   PageId: u16 | Upper: u16 | Lower: u16 | Rsvd: u16  │
//! ├──────────────────────────────────────────────────────┤
//! │ Data Region (8184 bytes)                             │
//! │   [unused 8] [slot 0][slot 1] ... ──▶ upper          │
//! │                                                      │
//! │                  free space                          │
//! │                                                      │
//! │   lower ◀── ... [record 1][record 0]                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each slot is `Offset: u16 | Length: u16`. All offsets are relative to the
//! start of the data region. Slots start at `HEADER_SIZE` so that no record
//! can ever be addressed by the null pointer `0`.

mod allocator;
mod page;
mod pointer;
mod record;

pub use allocator::{Arena, MemoryStats};
pub(crate) use allocator::page_count_for;
pub use page::Page;
pub use pointer::LogicalPointer;
pub use record::Record;

// =============================================================================
// Layout Constants
// =============================================================================

/// Size of one page, and of one block in a dump file
pub const PAGE_SIZE: usize = 8 * 1024;

/// Page header: PageId (2) + Upper (2) + Lower (2) + Reserved (2)
pub const HEADER_SIZE: usize = 8;

/// Data region following the header
pub const DATA_SIZE: usize = PAGE_SIZE - HEADER_SIZE;

/// Slot directory entry: Offset (2) + Length (2)
pub const SLOT_SIZE: usize = 4;

/// Largest record a fresh page can hold
pub const MAX_PAYLOAD: usize = DATA_SIZE - HEADER_SIZE - SLOT_SIZE;
