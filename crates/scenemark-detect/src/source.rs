//! The [`BoundarySource`] trait defining where scene boundaries come from.

use std::path::Path;

use crate::boundaries::SceneBoundaries;
use crate::Result;

/// A provider of scene boundaries for a video.
///
/// Detection may decode the whole video and take a long time; callers that
/// must stay responsive should run [`BoundarySource::detect`] on a worker
/// thread. Implementations must be safe to share across threads.
pub trait BoundarySource: Send + Sync {
    /// Human-readable name identifying this source.
    fn name(&self) -> &'static str;

    /// Produce the boundaries and frame rate for `input`.
    fn detect(&self, input: &Path) -> Result<SceneBoundaries>;
}

/// A fixed boundary list, returned for any input.
#[derive(Debug, Clone)]
pub struct StaticSource {
    boundaries: SceneBoundaries,
}

impl StaticSource {
    pub fn new(boundaries: SceneBoundaries) -> Self {
        Self { boundaries }
    }
}

impl BoundarySource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn detect(&self, _input: &Path) -> Result<SceneBoundaries> {
        Ok(self.boundaries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenemark_smf::FrameRate;

    #[test]
    fn static_source_returns_boundaries() {
        let boundaries =
            SceneBoundaries::new(vec![0, 300], FrameRate::new(25, 1).unwrap()).unwrap();
        let source: Box<dyn BoundarySource> = Box::new(StaticSource::new(boundaries.clone()));
        assert_eq!(source.name(), "static");
        assert_eq!(source.detect(Path::new("any.mp4")).unwrap(), boundaries);
    }
}
