//! External tool detection.
//!
//! [`ToolPaths`] resolves the `ffmpeg` and `ffprobe` executables, preferring
//! configured paths and falling back to `PATH`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tools the detectors shell out to.
pub const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Availability information for a tool, returned by [`ToolPaths::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// First line of `-version` output, if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Resolved tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
}

impl ToolPaths {
    /// Resolve tools, using an override when it exists and `PATH` otherwise.
    pub fn discover(ffmpeg_override: Option<&Path>, ffprobe_override: Option<&Path>) -> Self {
        Self {
            ffmpeg: resolve("ffmpeg", ffmpeg_override),
            ffprobe: resolve("ffprobe", ffprobe_override),
        }
    }

    /// Resolve both tools from `PATH`.
    pub fn from_path() -> Self {
        Self::discover(None, None)
    }

    /// Use the given paths without checking them.
    pub fn with_paths(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: Some(ffmpeg.into()),
            ffprobe: Some(ffprobe.into()),
        }
    }

    /// Path to ffmpeg, or [`Error::ToolNotFound`].
    pub fn ffmpeg(&self) -> Result<&Path> {
        self.ffmpeg
            .as_deref()
            .ok_or_else(|| Error::tool_not_found("ffmpeg"))
    }

    /// Path to ffprobe, or [`Error::ToolNotFound`].
    pub fn ffprobe(&self) -> Result<&Path> {
        self.ffprobe
            .as_deref()
            .ok_or_else(|| Error::tool_not_found("ffprobe"))
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| {
                let path = match name {
                    "ffmpeg" => self.ffmpeg.clone(),
                    _ => self.ffprobe.clone(),
                };
                match path {
                    Some(path) => ToolInfo {
                        name: name.to_string(),
                        available: true,
                        version: detect_version(&path),
                        path: Some(path),
                    },
                    None => ToolInfo {
                        name: name.to_string(),
                        available: false,
                        version: None,
                        path: None,
                    },
                }
            })
            .collect()
    }
}

fn resolve(name: &str, custom: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = custom {
        if p.exists() {
            return Some(p.to_path_buf());
        }
        tracing::warn!("Configured {} path does not exist: {:?}", name, p);
    }
    which::which(name).ok()
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

/// Map a spawn failure to [`Error::ToolNotFound`] or [`Error::Io`].
pub(crate) fn spawn_error(tool: &str, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::tool_not_found(tool)
    } else {
        Error::Io(e)
    }
}
