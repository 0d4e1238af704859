//! Frame rate and tempo values.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Default timeline resolution, in ticks per beat.
pub const TICKS_PER_BEAT: u16 = 960;

/// Default tempo, in beats per minute.
pub const DEFAULT_BPM: f64 = 60.0;

/// Largest value the 3-byte tempo field can hold.
pub const MAX_MICROS_PER_BEAT: u32 = 0x00FF_FFFF;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Decimal frame rates are captured to this many parts per frame.
const DECIMAL_SCALE: u32 = 1000;

/// Video frame rate as an exact positive fraction of frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "FrameRateFields")
)]
pub struct FrameRate {
    num: u32,
    den: u32,
}

impl FrameRate {
    /// Create a frame rate of `num / den` frames per second.
    pub fn new(num: u32, den: u32) -> Result<Self> {
        if num == 0 || den == 0 {
            return Err(Error::invalid_frame_rate(format!("{}/{}", num, den)));
        }
        let g = gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Create a frame rate from a decimal value such as `23.976`.
    ///
    /// The value is captured to thousandths of a frame per second.
    pub fn from_f64(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Error::invalid_frame_rate(fps.to_string()));
        }
        let scaled = (fps * DECIMAL_SCALE as f64).round();
        if scaled < 1.0 || scaled > u32::MAX as f64 {
            return Err(Error::invalid_frame_rate(fps.to_string()));
        }
        Self::new(scaled as u32, DECIMAL_SCALE)
    }

    /// Numerator of the reduced fraction.
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Denominator of the reduced fraction.
    pub fn den(&self) -> u32 {
        self.den
    }

    /// Frames per second as a float, for display.
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Ticks spanned by `frames` frames at one beat per second.
    ///
    /// Computed exactly and rounded half away from zero.
    pub fn frames_to_ticks(&self, frames: u64, ticks_per_beat: u16) -> u128 {
        let numerator = frames as u128 * ticks_per_beat as u128 * self.den as u128;
        let divisor = self.num as u128;
        (2 * numerator + divisor) / (2 * divisor)
    }

    /// Seconds elapsed after `frames` frames.
    pub fn frames_to_secs(&self, frames: u64) -> f64 {
        frames as f64 * self.den as f64 / self.num as f64
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for FrameRate {
    type Err = Error;

    /// Accepts `25`, `23.976`, `24000/1001` and the same with an `fps` suffix.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let value = lower.trim_end_matches("fps").trim();

        if let Some((num, den)) = value.split_once('/') {
            let num: i64 = num
                .trim()
                .parse()
                .map_err(|_| Error::invalid_frame_rate(s))?;
            let den: i64 = den
                .trim()
                .parse()
                .map_err(|_| Error::invalid_frame_rate(s))?;
            let num = u32::try_from(num).map_err(|_| Error::invalid_frame_rate(s))?;
            let den = u32::try_from(den).map_err(|_| Error::invalid_frame_rate(s))?;
            return Self::new(num, den);
        }

        let fps: f64 = value.parse().map_err(|_| Error::invalid_frame_rate(s))?;
        Self::from_f64(fps)
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = Error;

    fn try_from(fps: f64) -> Result<Self> {
        Self::from_f64(fps)
    }
}

/// Tempo in the container's native unit, microseconds per beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TempoFields")
)]
pub struct Tempo {
    micros_per_beat: u32,
}

impl Tempo {
    /// Convert beats per minute, rounding to the nearest microsecond.
    pub fn from_bpm(bpm: f64) -> Result<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(Error::invalid_tempo(format!("{} bpm", bpm)));
        }
        let micros = (MICROS_PER_MINUTE / bpm).round();
        if micros < 1.0 || micros > MAX_MICROS_PER_BEAT as f64 {
            return Err(Error::invalid_tempo(format!(
                "{} bpm is outside the representable range",
                bpm
            )));
        }
        Ok(Self {
            micros_per_beat: micros as u32,
        })
    }

    /// Create a tempo from a raw microseconds-per-beat value.
    pub fn from_micros_per_beat(micros_per_beat: u32) -> Result<Self> {
        if micros_per_beat == 0 || micros_per_beat > MAX_MICROS_PER_BEAT {
            return Err(Error::invalid_tempo(format!(
                "{} microseconds per beat",
                micros_per_beat
            )));
        }
        Ok(Self { micros_per_beat })
    }

    /// Microseconds per beat.
    pub fn micros_per_beat(&self) -> u32 {
        self.micros_per_beat
    }

    /// Beats per minute.
    pub fn bpm(&self) -> f64 {
        MICROS_PER_MINUTE / self.micros_per_beat as f64
    }

    /// Seconds elapsed after `ticks` ticks at `ticks_per_beat` resolution.
    pub fn ticks_to_secs(&self, ticks: u64, ticks_per_beat: u16) -> f64 {
        ticks as f64 * self.micros_per_beat as f64 / (ticks_per_beat as f64 * 1_000_000.0)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            micros_per_beat: 1_000_000,
        }
    }
}

/// Unchecked wire form of [`FrameRate`]; deserialization goes through [`FrameRate::new`].
#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct FrameRateFields {
    num: u32,
    den: u32,
}

#[cfg(feature = "serialize")]
impl TryFrom<FrameRateFields> for FrameRate {
    type Error = Error;

    fn try_from(fields: FrameRateFields) -> Result<Self> {
        Self::new(fields.num, fields.den)
    }
}

/// Unchecked wire form of [`Tempo`].
#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct TempoFields {
    micros_per_beat: u32,
}

#[cfg(feature = "serialize")]
impl TryFrom<TempoFields> for Tempo {
    type Error = Error;

    fn try_from(fields: TempoFields) -> Result<Self> {
        Self::from_micros_per_beat(fields.micros_per_beat)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
