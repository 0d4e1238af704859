//! Video stream timing from ffprobe.

use std::path::Path;
use std::process::Command;

use scenemark_smf::FrameRate;
use serde::Deserialize;

use crate::tools::spawn_error;
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    start_time: Option<String>,
}

/// Timing of the first video stream of a file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoStreamInfo {
    pub frame_rate: FrameRate,
    /// Presentation time of the first frame, in seconds. Never negative.
    pub start_time: f64,
}

/// Frame rate of the first video stream of `path`.
///
/// Uses `r_frame_rate`, falling back to `avg_frame_rate` when ffprobe reports
/// `0/0`.
pub fn probe_frame_rate(ffprobe: &Path, path: &Path) -> Result<FrameRate> {
    Ok(video_stream_info(ffprobe, path)?.frame_rate)
}

/// Frame rate and start time of the first video stream of `path`.
pub fn video_stream_info(ffprobe: &Path, path: &Path) -> Result<VideoStreamInfo> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-select_streams",
            "v:0",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| spawn_error("ffprobe", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_failed("ffprobe", stderr.trim().to_string()));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

    let info = parse_stream_info(&json_str)?;
    tracing::debug!(
        path = %path.display(),
        fps = %info.frame_rate,
        start_time = info.start_time,
        "read video stream timing"
    );
    Ok(info)
}

fn parse_stream_info(json_str: &str) -> Result<VideoStreamInfo> {
    let output: FfprobeOutput = serde_json::from_str(json_str)?;

    let stream = output
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .ok_or_else(|| Error::parse_error("ffprobe", "no video stream"))?;

    let start_time = stream
        .start_time
        .as_deref()
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(0.0);

    let frame_rate = [stream.r_frame_rate, stream.avg_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|rate| rate.parse::<FrameRate>().ok())
        .ok_or_else(|| Error::parse_error("ffprobe", "video stream has no usable frame rate"))?;

    Ok(VideoStreamInfo {
        frame_rate,
        start_time,
    })
}
