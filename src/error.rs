//! Error types surfaced by index operations.

use thiserror::Error;

/// Errors returned by index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Vector length does not match the configured dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The index's configured dimension.
        expected: usize,
        /// The length of the offending vector.
        actual: usize,
    },

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O failure while reading or writing a snapshot.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot failed to decode or violated a graph invariant.
    #[error("malformed snapshot: {0}")]
    Snapshot(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IndexError>;
