use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scenemark")]
#[command(
    author,
    version,
    about = "Turn video scene cuts into MIDI marker tracks for DAW timelines"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect scene cuts in a video and write a marker file
    Detect {
        /// Video file to analyse
        #[arg(required = true)]
        video: PathBuf,

        /// Output file (default: the video path with a .mid extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tempo of the marker track in beats per minute
        #[arg(long)]
        bpm: Option<f64>,

        /// Frame rate to use instead of probing, e.g. 25 or 24000/1001
        #[arg(long)]
        fps: Option<String>,

        /// Scene-change threshold in (0, 1]
        #[arg(long)]
        threshold: Option<f64>,

        /// Minimum scene length in frames (default: 15)
        #[arg(long)]
        min_scene_len: Option<u64>,

        /// Print the marker report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a boundary list (JSON or text) into a marker file
    Convert {
        /// Boundary list file
        #[arg(required = true)]
        list: PathBuf,

        /// Output file (default: the list path with a .mid extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tempo of the marker track in beats per minute
        #[arg(long)]
        bpm: Option<f64>,

        /// Frame rate, overriding any fps given in the list
        #[arg(long)]
        fps: Option<String>,

        /// Sort and deduplicate the list and add frame 0 if missing
        #[arg(long)]
        normalize: bool,

        /// Print the marker report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a marker file and display its contents
    Inspect {
        /// Marker file to read
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
