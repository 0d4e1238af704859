//! # scenemark-detect
//!
//! Sources of scene boundaries for the scenemark marker codec.
//!
//! This crate provides:
//! - [`FfmpegSceneSource`] - scene-cut detection with ffmpeg's `select` filter
//! - [`ListSource`] - boundary lists from JSON or plain-text files
//! - [`video_stream_info`] - video frame rates and start times via ffprobe
//! - [`ToolPaths`] - discovery of the ffmpeg and ffprobe executables
//!
//! Every source yields [`SceneBoundaries`]: strictly increasing frames that
//! start at frame 0, plus the frame rate they were counted at.
//!
//! ## Example
//!
//! ```no_run
//! use scenemark_detect::{BoundarySource, FfmpegSceneSource, ToolPaths};
//!
//! let tools = ToolPaths::from_path();
//! let source = FfmpegSceneSource::new(&tools)?.with_threshold(0.4)?;
//! let boundaries = source.detect("/path/to/film.mkv".as_ref())?;
//! println!("{} scenes at {} fps", boundaries.len(), boundaries.frame_rate());
//! # Ok::<(), scenemark_detect::Error>(())
//! ```

mod error;

pub mod boundaries;
pub mod ffmpeg;
pub mod ffprobe;
pub mod list;
pub mod source;
pub mod tools;

// Re-exports
pub use boundaries::{enforce_min_scene_len, normalize_boundaries, SceneBoundaries};
pub use error::{Error, Result};
pub use ffmpeg::{FfmpegSceneSource, DEFAULT_MIN_SCENE_LEN, DEFAULT_THRESHOLD};
pub use ffprobe::{probe_frame_rate, video_stream_info, VideoStreamInfo};
pub use list::ListSource;
pub use source::{BoundarySource, StaticSource};
pub use tools::{ToolInfo, ToolPaths};
