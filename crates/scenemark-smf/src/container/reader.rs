//! Container parsing.

use super::{ChunkType, CHUNK_HEADER_SIZE, FORMAT_SINGLE_TRACK, HEADER_LENGTH, MAX_TICKS_PER_BEAT};
use super::MarkerFile;
use crate::event::{MetaEvent, MetaKind, META_STATUS};
use crate::track::Track;
use crate::{vlq, Error, Result};

/// Parsed chunk header.
#[derive(Debug, Clone, Copy)]
struct Chunk {
    chunk_type: ChunkType,
    /// Declared content length.
    length: usize,
    /// Offset where content starts (after type and length).
    data_offset: usize,
}

/// Byte cursor over the whole input.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::TruncatedInput {
                offset: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_chunk(&mut self) -> Result<Chunk> {
        let header = self.take(CHUNK_HEADER_SIZE)?;
        let chunk_type = ChunkType([header[0], header[1], header[2], header[3]]);
        let length = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
        Ok(Chunk {
            chunk_type,
            length,
            data_offset: self.pos,
        })
    }
}

/// Parse a single-track marker file.
///
/// The track chunk's declared length must match the bytes that follow it
/// exactly, and the events inside must end with end-of-track exactly at
/// that length.
pub fn deserialize(data: &[u8]) -> Result<MarkerFile> {
    let mut cursor = Cursor::new(data);

    let header = cursor.read_chunk()?;
    if header.chunk_type != ChunkType::MTHD {
        return Err(Error::malformed(format!(
            "expected {} chunk, found {}",
            ChunkType::MTHD,
            header.chunk_type
        )));
    }
    if header.length != HEADER_LENGTH as usize {
        return Err(Error::malformed(format!(
            "header chunk length {} (expected {})",
            header.length, HEADER_LENGTH
        )));
    }

    let format = cursor.read_u16()?;
    let tracks = cursor.read_u16()?;
    let division = cursor.read_u16()?;
    if format != FORMAT_SINGLE_TRACK {
        return Err(Error::malformed(format!("unsupported format {}", format)));
    }
    if tracks != 1 {
        return Err(Error::malformed(format!("expected 1 track, found {}", tracks)));
    }
    if division > MAX_TICKS_PER_BEAT {
        return Err(Error::malformed("SMPTE time division is not supported"));
    }
    if division == 0 {
        return Err(Error::malformed("zero ticks-per-beat division"));
    }

    let chunk = cursor.read_chunk()?;
    if chunk.chunk_type != ChunkType::MTRK {
        return Err(Error::malformed(format!(
            "expected {} chunk, found {}",
            ChunkType::MTRK,
            chunk.chunk_type
        )));
    }
    if chunk.length != cursor.remaining() {
        return Err(Error::malformed(format!(
            "track chunk declares {} bytes but {} follow",
            chunk.length,
            cursor.remaining()
        )));
    }

    let track = parse_track_body(data, chunk)?;
    Ok(MarkerFile::new(division, track))
}

fn parse_track_body(data: &[u8], chunk: Chunk) -> Result<Track> {
    let end = chunk.data_offset + chunk.length;
    let body = &data[..end];
    let mut pos = chunk.data_offset;
    let mut track = Track::new();

    while pos < end {
        let (delta, n) = vlq::decode(body, pos)?;
        pos += n;

        let status = *body
            .get(pos)
            .ok_or_else(|| Error::malformed("event runs past end of track chunk"))?;
        if status != META_STATUS {
            return Err(Error::malformed(format!(
                "unsupported event status {:#04x} at offset {}",
                status, pos
            )));
        }
        let kind = MetaKind(
            *body
                .get(pos + 1)
                .ok_or_else(|| Error::malformed("event runs past end of track chunk"))?,
        );
        pos += 2;

        let (len, n) = vlq::decode(body, pos)?;
        pos += n;
        let len = len as usize;
        if end - pos < len {
            return Err(Error::malformed(format!(
                "{} payload of {} bytes runs past end of track chunk",
                kind, len
            )));
        }
        let payload = &body[pos..pos + len];
        pos += len;

        if kind == MetaKind::END_OF_TRACK {
            if len != 0 {
                return Err(Error::malformed("end-of-track with non-empty payload"));
            }
            if pos != end {
                return Err(Error::malformed(format!(
                    "{} bytes after end-of-track",
                    end - pos
                )));
            }
            return Ok(track);
        }

        track.push(delta as u32, MetaEvent::parse(kind, payload)?);
    }

    Err(Error::malformed("track chunk has no end-of-track event"))
}
