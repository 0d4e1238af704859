mod types;

pub use types::*;

use anyhow::{Context, Result};
use scenemark_detect::ToolPaths;
use scenemark_smf::container::validate_division;
use scenemark_smf::Tempo;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_tool_paths(&mut config.tools);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./scenemark.toml", "~/.config/scenemark/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Resolve the external tools using any configured paths.
pub fn tool_paths(config: &Config) -> ToolPaths {
    ToolPaths::discover(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
}

fn expand_tool_paths(tools: &mut ToolsConfig) {
    for path in [&mut tools.ffmpeg_path, &mut tools.ffprobe_path]
        .into_iter()
        .flatten()
    {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        *path = PathBuf::from(expanded);
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    Tempo::from_bpm(config.markers.bpm)
        .with_context(|| format!("Invalid markers.bpm: {}", config.markers.bpm))?;

    validate_division(config.markers.ticks_per_beat).with_context(|| {
        format!(
            "Invalid markers.ticks_per_beat: {}",
            config.markers.ticks_per_beat
        )
    })?;

    let threshold = config.detection.threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        anyhow::bail!("detection.threshold must be in (0, 1], got {}", threshold);
    }

    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
