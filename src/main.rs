mod cli;

use scenemark::{
    config,
    pipeline::{default_output_path, MarkerPipeline, MarkerReport, MarkerSettings},
};
use scenemark_detect::{FfmpegSceneSource, ListSource};
use scenemark_smf::{FrameRate, MarkerFile, MetaEvent, Tempo};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "scenemark=debug,scenemark_detect=debug".to_string()
        } else {
            "scenemark=info,scenemark_detect=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Detect {
            video,
            output,
            bpm,
            fps,
            threshold,
            min_scene_len,
            json,
        } => detect_video(
            &video,
            cli.config.as_deref(),
            DetectOptions {
                output,
                bpm,
                fps,
                threshold,
                min_scene_len,
                json,
            },
        ),
        Commands::Convert {
            list,
            output,
            bpm,
            fps,
            normalize,
            json,
        } => convert_list(
            &list,
            cli.config.as_deref(),
            ConvertOptions {
                output,
                bpm,
                fps,
                normalize,
                json,
            },
        ),
        Commands::Inspect { file, json } => inspect_file(&file, json),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("scenemark {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

struct DetectOptions {
    output: Option<PathBuf>,
    bpm: Option<f64>,
    fps: Option<String>,
    threshold: Option<f64>,
    min_scene_len: Option<u64>,
    json: bool,
}

struct ConvertOptions {
    output: Option<PathBuf>,
    bpm: Option<f64>,
    fps: Option<String>,
    normalize: bool,
    json: bool,
}

fn parse_fps(fps: Option<&str>) -> Result<Option<FrameRate>> {
    fps.map(|s| {
        s.parse::<FrameRate>()
            .with_context(|| format!("Invalid --fps value: {}", s))
    })
    .transpose()
}

fn settings_for(config: &config::Config, bpm: Option<f64>) -> Result<MarkerSettings> {
    let mut settings = MarkerSettings::from(&config.markers);
    if let Some(bpm) = bpm {
        settings.bpm = bpm;
    }
    settings.tempo()?;
    Ok(settings)
}

fn detect_video(video: &Path, config_path: Option<&Path>, opts: DetectOptions) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !video.exists() {
        anyhow::bail!("Video file does not exist: {:?}", video);
    }

    let settings = settings_for(&config, opts.bpm)?;
    let frame_rate = parse_fps(opts.fps.as_deref())?;
    let threshold = opts.threshold.unwrap_or(config.detection.threshold);
    let min_scene_len = opts.min_scene_len.unwrap_or(config.detection.min_scene_len);

    let tools = config::tool_paths(&config);
    let source = FfmpegSceneSource::new(&tools)?
        .with_threshold(threshold)?
        .with_frame_rate(frame_rate)
        .with_min_scene_len(min_scene_len);

    let output = opts.output.unwrap_or_else(|| default_output_path(video));
    let report = MarkerPipeline::new(settings).run(&source, video, &output)?;

    print_report(&report, opts.json)
}

fn convert_list(list: &Path, config_path: Option<&Path>, opts: ConvertOptions) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !list.exists() {
        anyhow::bail!("Boundary list does not exist: {:?}", list);
    }

    let settings = settings_for(&config, opts.bpm)?;
    let source = ListSource::new()
        .with_frame_rate(parse_fps(opts.fps.as_deref())?)
        .normalize(opts.normalize);

    let output = opts.output.unwrap_or_else(|| default_output_path(list));
    let report = MarkerPipeline::new(settings).run(&source, list, &output)?;

    print_report(&report, opts.json)
}

fn print_report(report: &MarkerReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if let Some(ref output) = report.output {
        println!("Output: {}", output.display());
    }
    println!("Frame rate: {} fps", report.frame_rate);
    println!(
        "Tempo: {:.3} bpm, {} ticks per beat",
        report.bpm, report.ticks_per_beat
    );
    println!("\nMarkers: {}", report.markers.len());
    for marker in &report.markers {
        println!(
            "  {:<8} frame {:>8}  tick {:>10}  {:>10.3}s",
            marker.label, marker.frame, marker.tick, marker.seconds
        );
    }
    println!("\nDrift: {:+.3} ticks", report.drift_ticks);
    println!("Size: {} bytes", report.byte_len);

    Ok(())
}

#[derive(Serialize)]
struct InspectMarker<'a> {
    label: &'a str,
    tick: u64,
    seconds: f64,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    file: &'a Path,
    ticks_per_beat: u16,
    micros_per_beat: Option<u32>,
    bpm: Option<f64>,
    time_signature: Option<String>,
    events: usize,
    other_meta_events: usize,
    markers: Vec<InspectMarker<'a>>,
}

fn inspect_file(file: &Path, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let marker_file = MarkerFile::load(file)
        .with_context(|| format!("Failed to read marker file: {:?}", file))?;
    let track = &marker_file.track;
    let ticks_per_beat = marker_file.ticks_per_beat;
    let tempo = track.tempo();
    let seconds_tempo = tempo.unwrap_or_default();

    let report = InspectReport {
        file,
        ticks_per_beat,
        micros_per_beat: tempo.map(|t| t.micros_per_beat()),
        bpm: tempo.map(|t| t.bpm()),
        time_signature: track
            .time_signature()
            .map(|ts| format!("{}/{}", ts.numerator, ts.denominator)),
        events: track.len(),
        other_meta_events: track
            .events()
            .iter()
            .filter(|e| matches!(e.event, MetaEvent::Unknown { .. }))
            .count(),
        markers: track
            .markers()
            .into_iter()
            .map(|(tick, label)| InspectMarker {
                label,
                tick,
                seconds: seconds_tempo.ticks_to_secs(tick, ticks_per_beat),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Format: 0, 1 track, {} ticks per beat", ticks_per_beat);
    match (report.bpm, report.micros_per_beat) {
        (Some(bpm), Some(micros)) => {
            println!("Tempo: {:.3} bpm ({} us per beat)", bpm, micros)
        }
        _ => println!(
            "Tempo: none (assuming {:.0} bpm)",
            Tempo::default().bpm()
        ),
    }
    if let Some(ref ts) = report.time_signature {
        println!("Time signature: {}", ts);
    }
    println!("Events: {}", report.events);
    if report.other_meta_events > 0 {
        println!("Other meta events: {}", report.other_meta_events);
    }

    println!("\nMarkers: {}", report.markers.len());
    for marker in &report.markers {
        println!(
            "  {:<8} tick {:>10}  {:>10.3}s",
            marker.label, marker.tick, marker.seconds
        );
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = config::tool_paths(&config).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. `detect` needs ffmpeg and ffprobe; `convert` works without them.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Tempo: {} bpm", config.markers.bpm);
    println!("  Ticks per beat: {}", config.markers.ticks_per_beat);
    println!("  Scene threshold: {}", config.detection.threshold);
    println!("  Minimum scene length: {} frames", config.detection.min_scene_len);
    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        match path {
            Some(p) => println!("  {}: {}", name, p.display()),
            None => println!("  {}: from PATH", name),
        }
    }

    Ok(())
}
