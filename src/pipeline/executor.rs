use crate::config::MarkersConfig;
use crate::progress::{ProgressSink, TracingSink};
use anyhow::{Context, Result};
use scenemark_detect::{BoundarySource, SceneBoundaries};
use scenemark_smf::container::validate_division;
use scenemark_smf::{serialize, MarkerTrackBuilder, Tempo, DEFAULT_BPM, TICKS_PER_BEAT};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Drift, in ticks, above which a run logs a warning.
const DRIFT_WARN_TICKS: f64 = 1.0;

/// Tempo and resolution of the generated marker track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSettings {
    pub bpm: f64,
    pub ticks_per_beat: u16,
}

impl MarkerSettings {
    pub fn new(bpm: f64, ticks_per_beat: u16) -> Self {
        Self {
            bpm,
            ticks_per_beat,
        }
    }

    /// Check the settings and return the tempo they describe.
    pub fn tempo(&self) -> Result<Tempo> {
        validate_division(self.ticks_per_beat)
            .with_context(|| format!("Invalid ticks per beat: {}", self.ticks_per_beat))?;
        Tempo::from_bpm(self.bpm).with_context(|| format!("Invalid bpm: {}", self.bpm))
    }
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BPM, TICKS_PER_BEAT)
    }
}

impl From<&MarkersConfig> for MarkerSettings {
    fn from(config: &MarkersConfig) -> Self {
        Self::new(config.bpm, config.ticks_per_beat)
    }
}

/// One marker as written to the track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerEntry {
    pub label: String,
    /// Scene-start frame in the video.
    pub frame: u64,
    /// Absolute tick position on the track.
    pub tick: u64,
    /// Scene start in video time.
    pub seconds: f64,
}

/// The outcome of rendering a boundary list.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerReport {
    pub frame_rate: String,
    pub bpm: f64,
    pub ticks_per_beat: u16,
    pub markers: Vec<MarkerEntry>,
    /// Accumulated ticks minus the exact position of the last boundary.
    pub drift_ticks: f64,
    pub byte_len: usize,
    /// Where the file was written, once it has been.
    pub output: Option<PathBuf>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Turns scene boundaries into a marker file.
///
/// Each call is independent; a pipeline may be shared between threads.
pub struct MarkerPipeline {
    settings: MarkerSettings,
    sink: Arc<dyn ProgressSink>,
}

impl MarkerPipeline {
    pub fn new(settings: MarkerSettings) -> Self {
        Self {
            settings,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> MarkerSettings {
        self.settings
    }

    /// Encode the marker file in memory.
    pub fn render(&self, boundaries: &SceneBoundaries) -> Result<MarkerReport> {
        let tempo = self.settings.tempo()?;
        let ticks_per_beat = self.settings.ticks_per_beat;
        let frame_rate = boundaries.frame_rate();

        let (track, timeline) = MarkerTrackBuilder::new()
            .tempo(tempo)
            .ticks_per_beat(ticks_per_beat)
            .build_with_timeline(boundaries.frames(), frame_rate)
            .context("Failed to convert boundaries to ticks")?;

        let bytes = serialize(&track, ticks_per_beat).context("Failed to encode marker track")?;

        let markers: Vec<MarkerEntry> = track
            .markers()
            .into_iter()
            .zip(boundaries.frames())
            .map(|((tick, label), &frame)| MarkerEntry {
                label: label.to_string(),
                frame,
                tick,
                seconds: frame_rate.frames_to_secs(frame),
            })
            .collect();

        let drift_ticks = timeline.drift_ticks();
        if drift_ticks.abs() >= DRIFT_WARN_TICKS {
            tracing::warn!(
                drift_ticks,
                "Rounding drift exceeds {} tick(s) at the last marker",
                DRIFT_WARN_TICKS
            );
        }

        self.sink.status(&format!(
            "Encoded {} markers ({} bytes, drift {:+.3} ticks)",
            markers.len(),
            bytes.len(),
            drift_ticks
        ));

        Ok(MarkerReport {
            frame_rate: frame_rate.to_string(),
            bpm: tempo.bpm(),
            ticks_per_beat,
            markers,
            drift_ticks,
            byte_len: bytes.len(),
            output: None,
            bytes,
        })
    }

    /// Obtain boundaries from `source`, render them and write `output`.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn run(
        &self,
        source: &dyn BoundarySource,
        input: &Path,
        output: &Path,
    ) -> Result<MarkerReport> {
        self.settings.tempo()?;

        self.sink.status(&format!(
            "Reading scene boundaries from {} ({})",
            input.display(),
            source.name()
        ));
        let boundaries = source
            .detect(input)
            .with_context(|| format!("Failed to get scene boundaries for {:?}", input))?;
        self.sink.status(&format!(
            "Found {} scenes at {} fps",
            boundaries.len(),
            boundaries.frame_rate()
        ));

        let mut report = self.render(&boundaries)?;
        write_output(&report.bytes, output)?;
        report.output = Some(output.to_path_buf());

        self.sink
            .status(&format!("Wrote marker file {}", output.display()));
        Ok(report)
    }
}

/// The marker file written next to `video` when no output is given.
pub fn default_output_path(video: &Path) -> PathBuf {
    video.with_extension("mid")
}

/// Write through a temporary file in the destination directory, then rename.
fn write_output(bytes: &[u8], output: &Path) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    temp.write_all(bytes)
        .with_context(|| format!("Failed to write marker data for {:?}", output))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush marker data for {:?}", output))?;
    temp.persist(output)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write output file: {:?}", output))?;

    tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), output);
    Ok(())
}
