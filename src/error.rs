//! Error types for agrep
//!
//! Provides a unified error type for arena, index and storage operations.

use thiserror::Error;

/// Result type alias using AgrepError
pub type Result<T> = std::result::Result<T, AgrepError>;

/// Unified error type for agrep operations
#[derive(Debug, Error)]
pub enum AgrepError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Arena Errors
    // -------------------------------------------------------------------------
    #[error("Capacity exceeded: requested {requested} bytes, a page holds at most {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("Arena full: no page id left after {0}")]
    ArenaFull(u16),

    #[error("Invalid address: {0:#010x}")]
    InvalidAddress(u32),

    #[error("Record size mismatch: slot holds {expected} bytes, got {actual}")]
    RecordSize { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for AgrepError {
    fn from(e: bincode::Error) -> Self {
        AgrepError::Serialization(e.to_string())
    }
}
