use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use scenemark_smf::{DEFAULT_BPM, TICKS_PER_BEAT};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub markers: MarkersConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkersConfig {
    /// Tempo written to the marker track
    #[serde(default = "default_bpm")]
    pub bpm: f64,

    /// Timeline resolution (default: 960)
    #[serde(default = "default_ticks_per_beat")]
    pub ticks_per_beat: u16,
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

fn default_ticks_per_beat() -> u16 {
    TICKS_PER_BEAT
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            ticks_per_beat: default_ticks_per_beat(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Scene-change score in (0, 1] above which a cut is reported
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Minimum scene length in frames (default: 15, 0 keeps every cut)
    #[serde(default = "default_min_scene_len")]
    pub min_scene_len: u64,
}

fn default_threshold() -> f64 {
    scenemark_detect::DEFAULT_THRESHOLD
}

fn default_min_scene_len() -> u64 {
    scenemark_detect::DEFAULT_MIN_SCENE_LEN
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_scene_len: default_min_scene_len(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
