//! # agrep
//!
//! Anagram lookup backed by a miniature storage engine:
//! - A page-based memory arena addressed by logical pointers
//! - A hash index whose every node lives inside that arena
//! - Whole-arena dump/load to a flat file of fixed-size page blocks
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  agrep binary / Finder                       │
//! │        (scan text file, sort line bytes, report match)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ insert / lookup_first / dump / load
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                                │
//! │              (single owner of arena + index)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  HashIndex  │─────────▶│    Arena    │
//!   │ (root cache)│ Record   │   (pages)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Storage   │
//!                           │ (index file)│
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod arena;
pub mod index;
pub mod storage;
pub mod engine;
pub mod finder;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AgrepError, Result};
pub use config::{Config, FileFormat};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of agrep
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
