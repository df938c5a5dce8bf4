//! Engine Module
//!
//! The index service that owns the arena and the hash index.
//!
//! ## Responsibilities
//! - Own exactly one arena and the index stored inside it
//! - Route inserts and lookups through the index with the arena borrowed
//! - Flush the index root before dumping
//! - Replace the whole state atomically on load

use std::path::Path;

use tracing::{debug, info};

use crate::arena::{Arena, MemoryStats};
use crate::config::Config;
use crate::error::{AgrepError, Result};
use crate::index::HashIndex;
use crate::storage::{IndexFile, LoadedIndex};

/// Index service
///
/// ## Ownership Model
///
/// The engine is the single owner of the arena and the index. Mutating
/// operations take `&mut self`, lookups take `&self`; nothing is global, and
/// there is no interior mutability. Sharing an engine across threads would
/// need an explicit lock around it.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Page memory holding every index record
    arena: Arena,

    /// Index handle (cached root record)
    index: HashIndex,
}

impl Engine {
    /// Create an empty index
    ///
    /// The root record is the first allocation of the fresh arena, so it
    /// sits at the well-known root pointer.
    pub fn new(config: Config) -> Result<Self> {
        let mut arena = Arena::new();
        let index = HashIndex::create(&mut arena, config.hash_seed)?;

        Ok(Self {
            config,
            arena,
            index,
        })
    }

    /// Build an engine from an index file
    pub fn open(config: Config, path: &Path) -> Result<Self> {
        let (arena, index) = Self::read_index(path)?;
        Ok(Self {
            config,
            arena,
            index,
        })
    }

    /// Add `line` under `key`
    pub fn insert(&mut self, key: impl AsRef<[u8]>, line: u32) -> Result<()> {
        self.index.insert(&mut self.arena, key.as_ref(), line)
    }

    /// First value inserted under `key`'s hash
    pub fn lookup_first(&self, key: impl AsRef<[u8]>) -> Result<Option<u32>> {
        self.index.lookup_first(&self.arena, key.as_ref())
    }

    /// All values inserted under `key`'s hash, oldest first
    pub fn lookup_all(&self, key: impl AsRef<[u8]>) -> Result<Vec<u32>> {
        self.index.lookup_all(&self.arena, key.as_ref())
    }

    /// Write the whole index to `path` in the configured format
    pub fn dump_to_file(&mut self, path: &Path) -> Result<()> {
        self.index.flush_root(&mut self.arena)?;
        IndexFile::write(path, &self.arena, self.index.root_pointer(), self.config.file_format)?;

        info!(
            path = %path.display(),
            pages = self.arena.page_count(),
            format = ?self.config.file_format,
            "Index dumped"
        );
        Ok(())
    }

    /// Replace the current state with the index stored at `path`
    ///
    /// The file is fully read and validated first; on error the current
    /// state is left untouched.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let (arena, index) = Self::read_index(path)?;

        self.arena = arena;
        self.index = index;
        Ok(())
    }

    /// Page usage snapshot (diagnostic only)
    pub fn memory_stats(&self) -> MemoryStats {
        self.arena.stats()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seed of the current index (from the root record, not the config)
    pub fn seed(&self) -> u32 {
        self.index.seed()
    }

    /// Get the number of arena pages
    pub fn page_count(&self) -> usize {
        self.arena.page_count()
    }

    /// Get the number of non-empty buckets
    pub fn occupied_buckets(&self) -> usize {
        self.index.occupied_buckets()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn read_index(path: &Path) -> Result<(Arena, HashIndex)> {
        let LoadedIndex {
            arena,
            root,
            format,
        } = IndexFile::read(path)?;

        let index = HashIndex::open(&arena, root).map_err(|e| {
            AgrepError::Format(format!("index root at {} is unreadable: {}", root, e))
        })?;

        debug!(path = %path.display(), ?format, pages = arena.page_count(), seed = index.seed(), "Index read");
        Ok((arena, index))
    }
}
