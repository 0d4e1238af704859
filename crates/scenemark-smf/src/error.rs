//! Error types for scenemark-smf.

use std::io;
use thiserror::Error;

/// Result type for scenemark-smf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for scenemark-smf operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Frame rate is zero, negative, non-finite or unparseable.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(String),

    /// No scene boundaries were supplied.
    #[error("Boundary list is empty")]
    EmptyBoundaryList,

    /// A boundary is not strictly greater than the one before it.
    #[error("Boundaries out of order at index {index}: {current} follows {previous}")]
    UnorderedBoundaries {
        index: usize,
        previous: u64,
        current: u64,
    },

    /// Tempo is not positive or does not fit the 24-bit tempo field.
    #[error("Invalid tempo: {0}")]
    InvalidTempo(String),

    /// Ticks-per-beat is zero or does not fit the 15-bit division field.
    #[error("Invalid ticks-per-beat division: {0}")]
    InvalidDivision(u32),

    /// Value does not fit in a 4-byte variable-length quantity.
    #[error("Value {0} exceeds the variable-length quantity limit")]
    ValueTooLarge(u64),

    /// Marker label byte length does not fit in a variable-length quantity.
    #[error("Label of {len} bytes is too long")]
    LabelTooLong { len: usize },

    /// Input ended in the middle of a field.
    #[error("Truncated input at offset {offset}")]
    TruncatedInput { offset: usize },

    /// Container structure is invalid.
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an invalid frame rate error.
    pub fn invalid_frame_rate(msg: impl Into<String>) -> Self {
        Self::InvalidFrameRate(msg.into())
    }

    /// Create an invalid tempo error.
    pub fn invalid_tempo(msg: impl Into<String>) -> Self {
        Self::InvalidTempo(msg.into())
    }

    /// Create a malformed container error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContainer(msg.into())
    }
}
