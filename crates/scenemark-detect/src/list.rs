//! Boundary lists read from files.
//!
//! Two formats are accepted:
//!
//! - JSON: `{"fps": "25", "frames": [0, 300, 533]}`. `fps` may be a number
//!   or any string [`FrameRate`] parses, such as `"24000/1001"`.
//! - Text: one frame number per line (commas and whitespace also separate),
//!   `#` starts a comment, and a line `fps=25` sets the frame rate.

use std::path::{Path, PathBuf};

use scenemark_smf::FrameRate;
use serde::Deserialize;

use crate::boundaries::{normalize_boundaries, SceneBoundaries};
use crate::source::BoundarySource;
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonRate {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct JsonList {
    fps: Option<JsonRate>,
    frames: Vec<u64>,
}

/// A parsed list before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawList {
    pub frames: Vec<u64>,
    pub frame_rate: Option<FrameRate>,
}

/// Parse list contents, picking the format from the first non-blank character.
pub fn parse_list(contents: &str) -> Result<RawList> {
    if contents.trim_start().starts_with('{') {
        parse_json_list(contents)
    } else {
        parse_text_list(contents)
    }
}

fn parse_json_list(contents: &str) -> Result<RawList> {
    let list: JsonList = serde_json::from_str(contents)?;
    let frame_rate = match list.fps {
        None => None,
        Some(JsonRate::Number(fps)) => Some(FrameRate::from_f64(fps)?),
        Some(JsonRate::Text(fps)) => Some(fps.parse()?),
    };
    Ok(RawList {
        frames: list.frames,
        frame_rate,
    })
}

fn parse_text_list(contents: &str) -> Result<RawList> {
    let mut frames = Vec::new();
    let mut frame_rate = None;

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case("fps") {
                frame_rate = Some(value.trim().parse()?);
                continue;
            }
            return Err(Error::parse_error(
                "boundary list",
                format!("line {}: unknown setting '{}'", line_no + 1, key.trim()),
            ));
        }

        for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let frame = token.parse::<u64>().map_err(|_| {
                Error::parse_error(
                    "boundary list",
                    format!("line {}: '{}' is not a frame number", line_no + 1, token),
                )
            })?;
            frames.push(frame);
        }
    }

    Ok(RawList { frames, frame_rate })
}

/// Reads scene boundaries from a JSON or text list instead of a video.
#[derive(Debug, Clone, Default)]
pub struct ListSource {
    frame_rate: Option<FrameRate>,
    normalize: bool,
}

impl ListSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame rate to use, overriding any rate in the file.
    pub fn with_frame_rate(mut self, frame_rate: Option<FrameRate>) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Sort, deduplicate and prepend frame 0 instead of rejecting such lists.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Build boundaries from list contents already in memory.
    pub fn from_contents(&self, contents: &str) -> Result<SceneBoundaries> {
        let raw = parse_list(contents)?;
        let frame_rate = self.frame_rate.or(raw.frame_rate).ok_or_else(|| {
            Error::invalid_input("boundary list has no fps and none was given")
        })?;
        let frames = if self.normalize {
            normalize_boundaries(raw.frames)
        } else {
            raw.frames
        };
        SceneBoundaries::new(frames, frame_rate)
    }
}

impl BoundarySource for ListSource {
    fn name(&self) -> &'static str {
        "list"
    }

    fn detect(&self, input: &Path) -> Result<SceneBoundaries> {
        if !input.exists() {
            return Err(Error::FileNotFound {
                path: PathBuf::from(input),
            });
        }
        let contents = std::fs::read_to_string(input)?;
        let boundaries = self.from_contents(&contents)?;
        tracing::debug!(
            input = %input.display(),
            scenes = boundaries.len(),
            fps = %boundaries.frame_rate(),
            "read boundary list"
        );
        Ok(boundaries)
    }
}
