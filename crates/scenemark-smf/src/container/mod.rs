//! Standard MIDI File container.
//!
//! A marker file is two chunks. Each chunk is a 4-byte ASCII type, a
//! 4-byte big-endian length, then `length` bytes of content:
//!
//! ```text
//! MThd 00000006 | format u16 | tracks u16 | division u16
//! MTrk <length> | (vlq delta, meta-event)* | 00 FF 2F 00
//! ```

mod reader;
mod writer;

pub use reader::deserialize;
pub use writer::{encode_track_body, serialize};

use crate::track::Track;
use crate::{Error, Result};
use std::path::Path;

/// Four-character chunk type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const MTHD: Self = Self(*b"MThd");
    pub const MTRK: Self = Self(*b"MTrk");

    /// Get the 4-char code as a string.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content length of the header chunk.
pub const HEADER_LENGTH: u32 = 6;

/// Size of a chunk's type and length fields.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Single-track file format.
pub const FORMAT_SINGLE_TRACK: u16 = 0;

/// Largest ticks-per-beat value; the top bit of the division selects SMPTE timing.
pub const MAX_TICKS_PER_BEAT: u16 = 0x7FFF;

/// End-of-track meta-event with its zero delta.
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Reject divisions the container cannot express as ticks per beat.
pub fn validate_division(ticks_per_beat: u16) -> Result<()> {
    if ticks_per_beat == 0 || ticks_per_beat > MAX_TICKS_PER_BEAT {
        return Err(Error::InvalidDivision(ticks_per_beat as u32));
    }
    Ok(())
}

/// A complete single-track marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerFile {
    pub ticks_per_beat: u16,
    pub track: Track,
}

impl MarkerFile {
    pub fn new(ticks_per_beat: u16, track: Track) -> Self {
        Self {
            ticks_per_beat,
            track,
        }
    }

    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(&self.track, self.ticks_per_beat)
    }

    /// Decode from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        deserialize(data)
    }

    /// Read and decode a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        deserialize(&data)
    }

    /// Encode and write to a file.
    ///
    /// Encoding completes before the file is touched, so an encoding error
    /// never leaves a partial file behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.to_bytes()?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
