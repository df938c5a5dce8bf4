//! Index Module
//!
//! Persistent hash index whose every node lives in the arena.
//!
//! ## Responsibilities
//! - Map a key's 32-bit hash to the values inserted under it
//! - Keep all structure behind logical pointers so a page dump captures it
//! - Recover the whole index from a single root pointer
//!
//! ## Record Graph
//! ```text
//!  HashRoot (4100 bytes, first allocation on page 0)
//!  ┌──────────┬──────────┬─────┬────────────┬──────────┐
//!  │ bucket 0 │ bucket 1 │ ... │ bucket1023 │ seed u32 │
//!  └────┬─────┴──────────┴─────┴────────────┴──────────┘
//!       │
//!       ▼  BucketEntry (12 bytes)           ValueEntry (8 bytes)
//!  ┌──────┬────────┬──────┐           ┌───────┬──────┐   ┌───────┬──────┐
//!  │ hash │ values ├──────┼──────────▶│ value │ next ├──▶│ value │ next │
//!  └──────┴────────┴──┬───┘           └───────┴──────┘   └───────┴──────┘
//!                     │ next (same bucket, different hash)
//!                     ▼
//!                  BucketEntry ...
//! ```
//!
//! ## Known Limitation
//! Original keys are never stored. Two keys with the same 32-bit hash share
//! one bucket entry and one value chain, so a lookup answers for the hash,
//! not for the exact key.

mod murmur;
mod node;
mod table;

pub use murmur::murmur3_32;
pub use node::{BucketEntry, HashRoot, ValueEntry};
pub use table::HashIndex;

/// Number of bucket heads in the root record
pub const BUCKET_COUNT: usize = 1024;

/// Address of the root record in an arena where it was the first allocation
pub const ROOT_POINTER: u32 = crate::arena::HEADER_SIZE as u32;
