//! Configuration for agrep
//!
//! Centralized configuration with sensible defaults. Page size and bucket
//! count are part of the file format and live in `arena` / `index` as
//! constants instead.

/// Default seed for the index hash function
pub const DEFAULT_HASH_SEED: u32 = 0x1234;

/// Main configuration for an index engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Seed stored in a freshly created index root.
    /// Loaded indexes keep the seed recorded in their root record.
    pub hash_seed: u32,

    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Layout used when dumping an index to disk
    pub file_format: FileFormat,

    /// Extension (without the dot) that marks a file as a dumped index
    pub index_extension: String,
}

/// On-disk layout written by `dump_to_file`
///
/// Loading accepts both layouts regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Page blocks only; the root is found at the well-known first allocation
    Raw,

    /// A leading superblock naming version, page count, root and checksum
    Superblock,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_seed: DEFAULT_HASH_SEED,
            file_format: FileFormat::Superblock,
            index_extension: "idx".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the hash seed for newly created indexes
    pub fn hash_seed(mut self, seed: u32) -> Self {
        self.config.hash_seed = seed;
        self
    }

    /// Set the on-disk layout used by dumps
    pub fn file_format(mut self, format: FileFormat) -> Self {
        self.config.file_format = format;
        self
    }

    /// Set the index file extension (leading dots are ignored)
    pub fn index_extension(mut self, ext: impl Into<String>) -> Self {
        let ext: String = ext.into();
        self.config.index_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
