//! Scene boundary lists handed to the marker codec.

use crate::{Error, Result};
use scenemark_smf::FrameRate;

/// Scene-start frames of one video plus its frame rate.
///
/// Frames are non-empty, strictly increasing and start at frame 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneBoundaries {
    frames: Vec<u64>,
    frame_rate: FrameRate,
}

impl SceneBoundaries {
    /// Validate and wrap a boundary list.
    pub fn new(frames: Vec<u64>, frame_rate: FrameRate) -> Result<Self> {
        scenemark_smf::validate_boundaries(&frames)?;
        if frames[0] != 0 {
            return Err(Error::invalid_input(format!(
                "first boundary must be frame 0, found {}",
                frames[0]
            )));
        }
        Ok(Self { frames, frame_rate })
    }

    pub fn frames(&self) -> &[u64] {
        &self.frames
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a boundary list holds at least frame 0.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_parts(self) -> (Vec<u64>, FrameRate) {
        (self.frames, self.frame_rate)
    }
}

/// Sort, deduplicate and make sure the list starts at frame 0.
pub fn normalize_boundaries(mut frames: Vec<u64>) -> Vec<u64> {
    let before = frames.len();
    frames.sort_unstable();
    frames.dedup();
    if frames.first() != Some(&0) {
        frames.insert(0, 0);
    }
    if frames.len() != before {
        tracing::debug!(before, after = frames.len(), "normalized boundary list");
    }
    frames
}

/// Drop cuts closer than `min_scene_len` frames to the previous kept boundary.
///
/// Frame 0 is always kept. Expects a normalized list.
pub fn enforce_min_scene_len(frames: Vec<u64>, min_scene_len: u64) -> Vec<u64> {
    if min_scene_len <= 1 {
        return frames;
    }
    let mut kept: Vec<u64> = Vec::with_capacity(frames.len());
    for frame in frames {
        match kept.last() {
            Some(&last) if frame - last < min_scene_len => {
                tracing::debug!(frame, last, min_scene_len, "dropping short scene");
            }
            _ => kept.push(frame),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pal() -> FrameRate {
        FrameRate::new(25, 1).unwrap()
    }

    #[test]
    fn test_new_accepts_valid() {
        let b = SceneBoundaries::new(vec![0, 300, 533], pal()).unwrap();
        assert_eq!(b.frames(), &[0, 300, 533]);
        assert_eq!(b.len(), 3);
        assert_eq!(b.frame_rate(), pal());
    }

    #[test]
    fn test_new_rejects_bad_shape() {
        assert_matches!(
            SceneBoundaries::new(vec![], pal()),
            Err(Error::Codec(scenemark_smf::Error::EmptyBoundaryList))
        );
        assert_matches!(
            SceneBoundaries::new(vec![0, 10, 10], pal()),
            Err(Error::Codec(scenemark_smf::Error::UnorderedBoundaries { .. }))
        );
        assert_matches!(
            SceneBoundaries::new(vec![5, 10], pal()),
            Err(Error::InvalidInput(_))
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_boundaries(vec![533, 300, 300, 0]), vec![0, 300, 533]);
        assert_eq!(normalize_boundaries(vec![120, 48]), vec![0, 48, 120]);
        assert_eq!(normalize_boundaries(vec![]), vec![0]);
    }

    #[test]
    fn test_min_scene_len() {
        let frames = vec![0, 5, 20, 22, 40];
        assert_eq!(enforce_min_scene_len(frames.clone(), 0), frames);
        assert_eq!(enforce_min_scene_len(frames.clone(), 15), vec![0, 20, 40]);
        assert_eq!(enforce_min_scene_len(frames, 100), vec![0]);
    }
}
