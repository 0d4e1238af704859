//! Scene detection with ffmpeg's `select` and `showinfo` filters.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use scenemark_smf::FrameRate;

use crate::boundaries::{enforce_min_scene_len, normalize_boundaries, SceneBoundaries};
use crate::ffprobe::video_stream_info;
use crate::source::BoundarySource;
use crate::tools::{spawn_error, ToolPaths};
use crate::{Error, Result};

/// Default scene-change score above which ffmpeg reports a cut.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default minimum scene length, in frames.
pub const DEFAULT_MIN_SCENE_LEN: u64 = 15;

/// Detects scene cuts by running ffmpeg over the whole video.
#[derive(Debug, Clone)]
pub struct FfmpegSceneSource {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    threshold: f64,
    frame_rate: Option<FrameRate>,
    min_scene_len: u64,
}

impl FfmpegSceneSource {
    /// Create a source using the resolved tool paths.
    pub fn new(tools: &ToolPaths) -> Result<Self> {
        Ok(Self {
            ffmpeg: tools.ffmpeg()?.to_path_buf(),
            ffprobe: tools.ffprobe()?.to_path_buf(),
            threshold: DEFAULT_THRESHOLD,
            frame_rate: None,
            min_scene_len: DEFAULT_MIN_SCENE_LEN,
        })
    }

    /// Set the scene-change threshold, in `(0, 1]`.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::invalid_input(format!(
                "scene threshold must be in (0, 1], got {}",
                threshold
            )));
        }
        self.threshold = threshold;
        Ok(self)
    }

    /// Use this frame rate instead of probing the video.
    pub fn with_frame_rate(mut self, frame_rate: Option<FrameRate>) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Drop cuts that would leave a scene shorter than `frames`.
    pub fn with_min_scene_len(mut self, frames: u64) -> Self {
        self.min_scene_len = frames;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn filter_graph(&self) -> String {
        format!("select='gt(scene,{})',showinfo", self.threshold)
    }
}

impl BoundarySource for FfmpegSceneSource {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn detect(&self, input: &Path) -> Result<SceneBoundaries> {
        if !input.exists() {
            return Err(Error::FileNotFound {
                path: input.to_path_buf(),
            });
        }

        let stream = video_stream_info(&self.ffprobe, input)?;
        let frame_rate = self.frame_rate.unwrap_or(stream.frame_rate);

        tracing::info!(
            input = %input.display(),
            threshold = self.threshold,
            fps = %frame_rate,
            start_time = stream.start_time,
            "running scene detection"
        );

        let output = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-nostats", "-i"])
            .arg(input)
            .args(["-an", "-vf"])
            .arg(self.filter_graph())
            .args(["-f", "null", "-"])
            .output()
            .map_err(|e| spawn_error("ffmpeg", e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let message = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
            return Err(Error::tool_failed("ffmpeg", message));
        }

        let cuts = parse_showinfo(&stderr, frame_rate, stream.start_time);
        tracing::debug!(cuts = cuts.len(), "parsed showinfo output");

        let frames = enforce_min_scene_len(normalize_boundaries(cuts), self.min_scene_len);
        SceneBoundaries::new(frames, frame_rate)
    }
}

fn pts_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"pts_time:\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("pts_time pattern is valid")
    })
}

/// Extract cut frames from ffmpeg's showinfo log.
///
/// showinfo's `n:` counts selected frames only, so source frame numbers are
/// recovered from `pts_time` and the frame rate. `pts_time` counts from the
/// container clock, so the stream's `start_time` is subtracted first.
pub fn parse_showinfo(stderr: &str, frame_rate: FrameRate, start_time: f64) -> Vec<u64> {
    let pattern = pts_time_pattern();
    stderr
        .lines()
        .filter(|line| line.contains("Parsed_showinfo"))
        .filter_map(|line| pattern.captures(line))
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .map(|secs| secs - start_time)
        .filter(|secs| *secs >= 0.0)
        .map(|secs| (secs * frame_rate.num() as f64 / frame_rate.den() as f64).round() as u64)
        .collect()
}
