//! Container serialization.

use super::{validate_division, ChunkType, END_OF_TRACK, FORMAT_SINGLE_TRACK, HEADER_LENGTH};
use crate::track::Track;
use crate::{vlq, Error, Result};
use bytes::{BufMut, BytesMut};

/// Write a complete chunk: type + length (u32 BE) + content.
fn write_chunk(buf: &mut BytesMut, chunk_type: ChunkType, content: &[u8]) -> Result<()> {
    let len = u32::try_from(content.len())
        .map_err(|_| Error::malformed(format!("{} chunk of {} bytes", chunk_type, content.len())))?;
    buf.put_slice(&chunk_type.0);
    buf.put_u32(len);
    buf.put_slice(content);
    Ok(())
}

/// Encode the events of `track` followed by end-of-track.
pub fn encode_track_body(track: &Track) -> Result<BytesMut> {
    let mut body = BytesMut::with_capacity(16 + track.len() * 12);
    for event in track.events() {
        vlq::write(&mut body, event.delta as u64)?;
        event.event.write(&mut body)?;
    }
    body.put_slice(&END_OF_TRACK);
    Ok(body)
}

/// Serialize `track` as a single-track file at `ticks_per_beat` resolution.
///
/// The output depends only on the arguments.
pub fn serialize(track: &Track, ticks_per_beat: u16) -> Result<Vec<u8>> {
    validate_division(ticks_per_beat)?;

    let body = encode_track_body(track)?;

    let mut header = [0u8; HEADER_LENGTH as usize];
    header[0..2].copy_from_slice(&FORMAT_SINGLE_TRACK.to_be_bytes());
    header[2..4].copy_from_slice(&1u16.to_be_bytes());
    header[4..6].copy_from_slice(&ticks_per_beat.to_be_bytes());

    let mut buf = BytesMut::with_capacity(14 + 8 + body.len());
    write_chunk(&mut buf, ChunkType::MTHD, &header)?;
    write_chunk(&mut buf, ChunkType::MTRK, &body)?;
    Ok(buf.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MetaEvent, TimeSignature};
    use crate::timing::{FrameRate, Tempo};
    use crate::track::MarkerTrackBuilder;
    use assert_matches::assert_matches;

    /// Helper: read a big-endian u32 from a slice.
    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ])
    }

    #[test]
    fn test_write_chunk_layout() {
        let mut buf = BytesMut::new();
        write_chunk(&mut buf, ChunkType(*b"test"), &[1, 2, 3]).unwrap();
        assert_eq!(buf.len(), 11); // 8 header + 3 content
        assert_eq!(&buf[0..4], b"test");
        assert_eq!(read_u32(&buf, 4), 3);
        assert_eq!(&buf[8..], &[1, 2, 3]);
    }

    #[test]
    fn test_empty_track() {
        let bytes = serialize(&Track::new(), 960).unwrap();
        assert_eq!(
            bytes,
            [
                b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x03, 0xC0, //
                b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn test_reference_file_bytes() {
        let fps = FrameRate::new(25, 1).unwrap();
        let track = MarkerTrackBuilder::new()
            .build(&[0, 300, 533, 1121, 1778], fps)
            .unwrap();
        let bytes = serialize(&track, 960).unwrap();

        let expected_body: Vec<u8> = [
            &[0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40][..],
            &[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08],
            &[0x00, 0xFF, 0x06, 0x04, b'S', b'C', b' ', b'1'],
            // 11520 = 0xDA 0x00
            &[0xDA, 0x00, 0xFF, 0x06, 0x04, b'S', b'C', b' ', b'2'],
            // 8947 = 0xC5 0x73
            &[0xC5, 0x73, 0xFF, 0x06, 0x04, b'S', b'C', b' ', b'3'],
            // 22579 = 0x81 0xB0 0x33
            &[0x81, 0xB0, 0x33, 0xFF, 0x06, 0x04, b'S', b'C', b' ', b'4'],
            // 25229 = 0x81 0xC5 0x0D
            &[0x81, 0xC5, 0x0D, 0xFF, 0x06, 0x04, b'S', b'C', b' ', b'5'],
            &END_OF_TRACK,
        ]
        .concat();

        assert_eq!(&bytes[..14], b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x03\xC0");
        assert_eq!(&bytes[14..18], b"MTrk");
        assert_eq!(read_u32(&bytes, 18) as usize, expected_body.len());
        assert_eq!(&bytes[22..], &expected_body[..]);
    }

    #[test]
    fn test_deterministic() {
        let mut track = Track::new();
        track.push(0, MetaEvent::Tempo(Tempo::default()));
        track.push(0, MetaEvent::TimeSignature(TimeSignature::COMMON));
        track.push(0, MetaEvent::Marker("SC 1".into()));
        assert_eq!(serialize(&track, 960).unwrap(), serialize(&track, 960).unwrap());
    }

    #[test]
    fn test_invalid_division() {
        assert_matches!(serialize(&Track::new(), 0), Err(Error::InvalidDivision(0)));
        assert_matches!(serialize(&Track::new(), 0x8000), Err(Error::InvalidDivision(_)));
    }

    #[test]
    fn test_delta_too_large() {
        let mut track = Track::new();
        track.push(u32::MAX, MetaEvent::Marker("SC 1".into()));
        assert_matches!(serialize(&track, 960), Err(Error::ValueTooLarge(_)));
    }
}
