//! Meta-event definitions and payload encoding.
//!
//! Every event in a marker track is a meta-event: `0xFF`, a one-byte kind,
//! a variable-length payload length, then the payload.

use crate::timing::{Tempo, MAX_MICROS_PER_BEAT};
use crate::vlq;
use crate::{Error, Result};
use bytes::BufMut;

/// Status byte introducing a meta-event.
pub const META_STATUS: u8 = 0xFF;

/// One-byte meta-event kind code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetaKind(pub u8);

impl MetaKind {
    pub const MARKER: Self = Self(0x06);
    pub const END_OF_TRACK: Self = Self(0x2F);
    pub const TEMPO: Self = Self(0x51);
    pub const TIME_SIGNATURE: Self = Self(0x58);

    /// Human-readable name of the kind.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::MARKER => "marker",
            Self::END_OF_TRACK => "end_of_track",
            Self::TEMPO => "set_tempo",
            Self::TIME_SIGNATURE => "time_signature",
            _ => "unknown",
        }
    }
}

impl std::fmt::Display for MetaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), self.0)
    }
}

/// Time signature meta-event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    pub numerator: u8,
    /// Actual note value (4 = quarter note), stored as its base-2 log.
    pub denominator: u8,
    pub clocks_per_click: u8,
    pub thirty_seconds_per_beat: u8,
}

impl TimeSignature {
    /// 4/4, metronome every 24 clocks, eight 32nd notes per beat.
    pub const COMMON: Self = Self {
        numerator: 4,
        denominator: 4,
        clocks_per_click: 24,
        thirty_seconds_per_beat: 8,
    };

    fn encode(&self) -> Result<[u8; 4]> {
        if !self.denominator.is_power_of_two() {
            return Err(Error::malformed(format!(
                "time signature denominator {} is not a power of two",
                self.denominator
            )));
        }
        Ok([
            self.numerator,
            self.denominator.trailing_zeros() as u8,
            self.clocks_per_click,
            self.thirty_seconds_per_beat,
        ])
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let [numerator, log2, clocks_per_click, thirty_seconds_per_beat] =
            <[u8; 4]>::try_from(data).map_err(|_| {
                Error::malformed(format!("time signature payload is {} bytes", data.len()))
            })?;
        if log2 > 7 {
            return Err(Error::malformed(format!(
                "time signature denominator exponent {} out of range",
                log2
            )));
        }
        Ok(Self {
            numerator,
            denominator: 1 << log2,
            clocks_per_click,
            thirty_seconds_per_beat,
        })
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

/// A meta-event carried in a marker track.
///
/// End-of-track is not represented; the writer appends it and the reader
/// consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    Tempo(Tempo),
    TimeSignature(TimeSignature),
    Marker(String),
    /// Any other meta kind, kept verbatim.
    Unknown { kind: u8, data: Vec<u8> },
}

impl MetaEvent {
    /// Kind code of this event.
    pub fn kind(&self) -> MetaKind {
        match self {
            Self::Tempo(_) => MetaKind::TEMPO,
            Self::TimeSignature(_) => MetaKind::TIME_SIGNATURE,
            Self::Marker(_) => MetaKind::MARKER,
            Self::Unknown { kind, .. } => MetaKind(*kind),
        }
    }

    /// Payload bytes, without the status, kind and length prefix.
    pub fn payload(&self) -> Result<Vec<u8>> {
        match self {
            Self::Tempo(tempo) => {
                if tempo.micros_per_beat() > MAX_MICROS_PER_BEAT {
                    return Err(Error::invalid_tempo(format!(
                        "{} microseconds per beat does not fit in 3 bytes",
                        tempo.micros_per_beat()
                    )));
                }
                let [_, hi, mid, lo] = tempo.micros_per_beat().to_be_bytes();
                Ok(vec![hi, mid, lo])
            }
            Self::TimeSignature(sig) => Ok(sig.encode()?.to_vec()),
            Self::Marker(label) => {
                check_payload_len(label.len())?;
                Ok(label.as_bytes().to_vec())
            }
            Self::Unknown { kind, data } => {
                if *kind == MetaKind::END_OF_TRACK.0 {
                    return Err(Error::malformed("end-of-track cannot appear inside a track"));
                }
                Ok(data.clone())
            }
        }
    }

    /// Write the complete meta-event (status, kind, length, payload).
    pub fn write<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let payload = self.payload()?;
        write_meta(buf, self.kind(), &payload)
    }

    /// Interpret a payload of the given kind.
    pub fn parse(kind: MetaKind, data: &[u8]) -> Result<Self> {
        match kind {
            MetaKind::TEMPO => {
                let [hi, mid, lo] = <[u8; 3]>::try_from(data).map_err(|_| {
                    Error::malformed(format!("tempo payload is {} bytes", data.len()))
                })?;
                let micros = u32::from_be_bytes([0, hi, mid, lo]);
                let tempo = Tempo::from_micros_per_beat(micros)
                    .map_err(|e| Error::malformed(e.to_string()))?;
                Ok(Self::Tempo(tempo))
            }
            MetaKind::TIME_SIGNATURE => Ok(Self::TimeSignature(TimeSignature::decode(data)?)),
            MetaKind::MARKER => {
                let label = String::from_utf8(data.to_vec())
                    .map_err(|e| Error::malformed(format!("marker text is not UTF-8: {}", e)))?;
                Ok(Self::Marker(label))
            }
            MetaKind::END_OF_TRACK => Err(Error::malformed("unexpected end-of-track")),
            MetaKind(other) => Ok(Self::Unknown {
                kind: other,
                data: data.to_vec(),
            }),
        }
    }

    /// Marker label, if this is a marker.
    pub fn as_marker(&self) -> Option<&str> {
        match self {
            Self::Marker(label) => Some(label),
            _ => None,
        }
    }
}

/// A meta payload length must fit in one variable-length quantity.
pub(crate) fn check_payload_len(len: usize) -> Result<()> {
    if len as u64 > vlq::MAX_VALUE {
        return Err(Error::LabelTooLong { len });
    }
    Ok(())
}

/// Write a raw meta-event.
pub(crate) fn write_meta<B: BufMut>(buf: &mut B, kind: MetaKind, payload: &[u8]) -> Result<()> {
    check_payload_len(payload.len())?;
    buf.put_u8(META_STATUS);
    buf.put_u8(kind.0);
    vlq::write(buf, payload.len() as u64)?;
    buf.put_slice(payload);
    Ok(())
}

/// A meta-event with its delta time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    /// Ticks since the previous event.
    pub delta: u32,
    pub event: MetaEvent,
}

impl TrackEvent {
    pub fn new(delta: u32, event: MetaEvent) -> Self {
        Self { delta, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn encoded(event: &MetaEvent) -> Vec<u8> {
        let mut out = Vec::new();
        event.write(&mut out).unwrap();
        out
    }

    #[test]
    fn test_tempo_60_bpm() {
        let event = MetaEvent::Tempo(Tempo::from_bpm(60.0).unwrap());
        let bytes = encoded(&event);
        assert_eq!(bytes, [0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40]);
        let micros = u32::from_be_bytes([0, bytes[3], bytes[4], bytes[5]]);
        assert_eq!(micros, 1_000_000);
    }

    #[test]
    fn test_time_signature_common() {
        let bytes = encoded(&MetaEvent::TimeSignature(TimeSignature::COMMON));
        assert_eq!(bytes, [0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08]);

        let parsed = MetaEvent::parse(MetaKind::TIME_SIGNATURE, &bytes[3..]).unwrap();
        assert_eq!(parsed, MetaEvent::TimeSignature(TimeSignature::COMMON));
        let MetaEvent::TimeSignature(sig) = parsed else {
            panic!("expected time signature");
        };
        assert_eq!(sig.numerator, 4);
        assert_eq!(sig.denominator, 4);
        assert_eq!(sig.clocks_per_click, 24);
        assert_eq!(sig.thirty_seconds_per_beat, 8);
    }

    #[test]
    fn test_marker_layout() {
        let bytes = encoded(&MetaEvent::Marker("SC 1".into()));
        assert_eq!(bytes, [0xFF, 0x06, 0x04, b'S', b'C', b' ', b'1']);
    }

    #[test]
    fn test_long_marker_length_is_vlq() {
        let label = "x".repeat(200);
        let bytes = encoded(&MetaEvent::Marker(label.clone()));
        assert_eq!(&bytes[..4], &[0xFF, 0x06, 0x81, 0x48]);
        assert_eq!(bytes.len(), 4 + 200);
        assert_eq!(
            MetaEvent::parse(MetaKind::MARKER, &bytes[4..]).unwrap(),
            MetaEvent::Marker(label)
        );
    }

    #[test]
    fn test_payload_length_limit() {
        assert!(check_payload_len(0).is_ok());
        assert!(check_payload_len(vlq::MAX_VALUE as usize).is_ok());
        assert_matches!(
            check_payload_len(vlq::MAX_VALUE as usize + 1),
            Err(Error::LabelTooLong { len }) if len == 0x1000_0000
        );
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert_matches!(
            MetaEvent::parse(MetaKind::TEMPO, &[0x0F, 0x42]),
            Err(Error::MalformedContainer(_))
        );
        assert_matches!(
            MetaEvent::parse(MetaKind::TEMPO, &[0, 0, 0]),
            Err(Error::MalformedContainer(_))
        );
        assert_matches!(
            MetaEvent::parse(MetaKind::TIME_SIGNATURE, &[4, 9, 24, 8]),
            Err(Error::MalformedContainer(_))
        );
        assert_matches!(
            MetaEvent::parse(MetaKind::MARKER, &[0xC3, 0x28]),
            Err(Error::MalformedContainer(_))
        );
        assert_matches!(
            MetaEvent::parse(MetaKind::END_OF_TRACK, &[]),
            Err(Error::MalformedContainer(_))
        );
    }

    #[test]
    fn test_unknown_kind_kept() {
        let event = MetaEvent::parse(MetaKind(0x03), b"Scenes").unwrap();
        assert_eq!(
            event,
            MetaEvent::Unknown {
                kind: 0x03,
                data: b"Scenes".to_vec()
            }
        );
        assert_eq!(encoded(&event)[..3], [0xFF, 0x03, 0x06]);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MetaKind::TEMPO.to_string(), "set_tempo (0x51)");
        assert_eq!(MetaKind(0x7F).name(), "unknown");
    }
}
