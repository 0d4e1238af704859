//! Frame boundaries to tick deltas.
//!
//! Each gap between consecutive boundaries is converted on its own and
//! rounded to a whole tick, so rounding error is not carried between gaps.
//! Over a long boundary list the accumulated ticks can drift from the exact
//! position by up to half a tick per gap; [`Timeline::drift_ticks`] reports it.

use crate::timing::FrameRate;
use crate::vlq;
use crate::{Error, Result};

/// Check that `frames` is non-empty and strictly increasing.
pub fn validate_boundaries(frames: &[u64]) -> Result<()> {
    if frames.is_empty() {
        return Err(Error::EmptyBoundaryList);
    }
    for (index, pair) in frames.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(Error::UnorderedBoundaries {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    Ok(())
}

/// Tick deltas for a boundary list.
///
/// The first delta is always 0; every following one is the rounded tick
/// length of the gap to the previous boundary.
pub fn tick_deltas(frames: &[u64], fps: FrameRate, ticks_per_beat: u16) -> Result<Vec<u32>> {
    validate_boundaries(frames)?;

    let mut deltas = Vec::with_capacity(frames.len());
    deltas.push(0);
    for pair in frames.windows(2) {
        let ticks = fps.frames_to_ticks(pair[1] - pair[0], ticks_per_beat);
        if ticks > vlq::MAX_VALUE as u128 {
            return Err(Error::ValueTooLarge(u64::try_from(ticks).unwrap_or(u64::MAX)));
        }
        deltas.push(ticks as u32);
    }
    Ok(deltas)
}

/// A converted boundary list.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    deltas: Vec<u32>,
    exact_span: f64,
}

impl Timeline {
    /// Convert `frames` at `fps` into a tick timeline.
    pub fn build(frames: &[u64], fps: FrameRate, ticks_per_beat: u16) -> Result<Self> {
        let deltas = tick_deltas(frames, fps, ticks_per_beat)?;
        let span_frames = frames[frames.len() - 1] - frames[0];
        let exact_span =
            span_frames as f64 * ticks_per_beat as f64 * fps.den() as f64 / fps.num() as f64;
        Ok(Self { deltas, exact_span })
    }

    /// Per-boundary tick deltas.
    pub fn deltas(&self) -> &[u32] {
        &self.deltas
    }

    /// Number of boundaries.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Always false for a built timeline.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Absolute tick position of every boundary, relative to the first.
    pub fn absolute_ticks(&self) -> Vec<u64> {
        self.deltas
            .iter()
            .scan(0u64, |acc, &d| {
                *acc += d as u64;
                Some(*acc)
            })
            .collect()
    }

    /// Accumulated ticks minus the exact tick position of the last boundary.
    pub fn drift_ticks(&self) -> f64 {
        let total: u64 = self.deltas.iter().map(|&d| d as u64).sum();
        total as f64 - self.exact_span
    }

    /// Consume the timeline, returning the deltas.
    pub fn into_deltas(self) -> Vec<u32> {
        self.deltas
    }
}
