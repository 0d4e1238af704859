//! Pipeline integration tests
//!
//! Boundary lists on disk through the marker pipeline to a file that decodes
//! back to the same markers.

use std::path::Path;
use std::sync::Arc;

use assert_matches::assert_matches;

use scenemark::pipeline::{MarkerPipeline, MarkerSettings};
use scenemark::progress::{CollectingSink, NullSink};
use scenemark_detect::{ListSource, SceneBoundaries, StaticSource};
use scenemark_smf::{tick_deltas, FrameRate, MarkerFile, MetaEvent, Tempo};

// ===== Fixture functions =====

fn boundaries(frames: &[u64], fps: &str) -> SceneBoundaries {
    SceneBoundaries::new(frames.to_vec(), fps.parse::<FrameRate>().unwrap()).unwrap()
}

fn quiet_pipeline(settings: MarkerSettings) -> MarkerPipeline {
    MarkerPipeline::new(settings).with_sink(Arc::new(NullSink))
}

// ===== Tests =====

#[test]
fn list_to_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("cuts.txt");
    std::fs::write(&list, "fps=24000/1001\n0\n24\n240\n2400\n").unwrap();
    let output = dir.path().join("cuts.mid");

    let report = quiet_pipeline(MarkerSettings::default())
        .run(&ListSource::new(), &list, &output)
        .unwrap();

    let file = MarkerFile::load(&output).unwrap();
    assert_eq!(file.ticks_per_beat, 960);
    assert_eq!(file.track.tempo(), Some(Tempo::default()));

    let decoded: Vec<(u64, String)> = file
        .track
        .markers()
        .into_iter()
        .map(|(tick, label)| (tick, label.to_string()))
        .collect();
    let reported: Vec<(u64, String)> = report
        .markers
        .iter()
        .map(|m| (m.tick, m.label.clone()))
        .collect();
    assert_eq!(decoded, reported);

    // 24 frames at 23.976 fps is 1.001 s.
    assert_eq!(report.markers[1].tick, 961);
}

#[test]
fn tempo_changes_header_not_ticks() {
    let scenes = boundaries(&[0, 300, 533], "25");
    let slow = quiet_pipeline(MarkerSettings::new(60.0, 960))
        .render(&scenes)
        .unwrap();
    let fast = quiet_pipeline(MarkerSettings::new(150.0, 960))
        .render(&scenes)
        .unwrap();

    let ticks = |r: &scenemark::pipeline::MarkerReport| -> Vec<u64> {
        r.markers.iter().map(|m| m.tick).collect()
    };
    assert_eq!(ticks(&slow), ticks(&fast));
    assert_ne!(slow.bytes, fast.bytes);

    let file = MarkerFile::from_bytes(&fast.bytes).unwrap();
    assert_eq!(file.track.tempo().unwrap().micros_per_beat(), 400_000);
}

#[test]
fn track_layout_matches_marker_contract() {
    let report = quiet_pipeline(MarkerSettings::default())
        .render(&boundaries(&[0, 300, 533, 1121, 1778], "25"))
        .unwrap();
    let file = MarkerFile::from_bytes(&report.bytes).unwrap();
    let events = file.track.events();

    assert!(matches!(events[0].event, MetaEvent::Tempo(_)));
    assert!(matches!(events[1].event, MetaEvent::TimeSignature(_)));
    let deltas: Vec<u32> = events[2..].iter().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![0, 11520, 8947, 22579, 25229]);
}

#[test]
fn progress_is_reported_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(CollectingSink::new());
    let pipeline = MarkerPipeline::new(MarkerSettings::default()).with_sink(sink.clone());

    pipeline
        .run(
            &StaticSource::new(boundaries(&[0, 25], "25")),
            Path::new("clip.mov"),
            &dir.path().join("clip.mid"),
        )
        .unwrap();

    let messages = sink.messages();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].starts_with("Reading scene boundaries"));
    assert!(messages[1].starts_with("Found 2 scenes"));
    assert!(messages[2].starts_with("Encoded 2 markers"));
    assert!(messages[3].starts_with("Wrote marker file"));
}

#[test]
fn concurrent_runs_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Arc::new(quiet_pipeline(MarkerSettings::default()));

    let handles: Vec<_> = (1..=8u64)
        .map(|n| {
            let pipeline = Arc::clone(&pipeline);
            let output = dir.path().join(format!("reel{}.mid", n));
            std::thread::spawn(move || {
                let frames: Vec<u64> = (0..=n).map(|i| i * 100).collect();
                let source = StaticSource::new(boundaries(&frames, "25"));
                pipeline
                    .run(&source, Path::new("reel.mkv"), &output)
                    .unwrap();
                (n, output)
            })
        })
        .collect();

    for handle in handles {
        let (n, output) = handle.join().unwrap();
        let file = MarkerFile::load(&output).unwrap();
        assert_eq!(file.track.markers().len() as u64, n + 1);
    }
}

#[test]
fn failing_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing.mid");

    let result = quiet_pipeline(MarkerSettings::default()).run(
        &ListSource::new(),
        &dir.path().join("missing.txt"),
        &output,
    );
    let err = result.unwrap_err();
    assert_matches!(
        err.downcast_ref::<scenemark_detect::Error>(),
        Some(scenemark_detect::Error::FileNotFound { .. })
    );
    assert!(!output.exists());
}

#[test]
fn invalid_settings_fail_before_detection() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.mid");
    let sink = Arc::new(CollectingSink::new());

    let pipeline = MarkerPipeline::new(MarkerSettings::new(-1.0, 960)).with_sink(sink.clone());
    let result = pipeline.run(
        &StaticSource::new(boundaries(&[0, 10], "25")),
        Path::new("clip.mov"),
        &output,
    );

    let err = result.unwrap_err();
    assert_matches!(
        err.downcast_ref::<scenemark_smf::Error>(),
        Some(scenemark_smf::Error::InvalidTempo(_))
    );
    assert!(sink.messages().is_empty());
    assert!(!output.exists());
}

#[test]
fn unordered_list_reports_codec_error() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("cuts.txt");
    std::fs::write(&list, "fps=25\n0\n533\n300\n").unwrap();

    let err = quiet_pipeline(MarkerSettings::default())
        .run(&ListSource::new(), &list, &dir.path().join("cuts.mid"))
        .unwrap_err();
    assert_matches!(
        err.downcast_ref::<scenemark_detect::Error>(),
        Some(scenemark_detect::Error::Codec(
            scenemark_smf::Error::UnorderedBoundaries { index: 2, previous: 533, current: 300 }
        ))
    );
}

#[test]
fn deserialized_values_are_validated() {
    assert_matches!(
        serde_json::from_str::<FrameRate>(r#"{"num":0,"den":1}"#),
        Err(_)
    );
    let fps: FrameRate = serde_json::from_str(r#"{"num":25,"den":1}"#).unwrap();
    assert_eq!(tick_deltas(&[0, 10], fps, 960).unwrap(), vec![0, 384]);

    assert_matches!(
        serde_json::from_str::<Tempo>(r#"{"micros_per_beat":20000000}"#),
        Err(_)
    );

    // A marker file round-tripped through JSON keeps its tempo exactly.
    let report = quiet_pipeline(MarkerSettings::new(4.0, 960))
        .render(&boundaries(&[0, 25], "25"))
        .unwrap();
    let file = MarkerFile::from_bytes(&report.bytes).unwrap();
    let json = serde_json::to_string(&file).unwrap();
    let back: MarkerFile = serde_json::from_str(&json).unwrap();
    assert_eq!(back, file);
    assert_eq!(back.track.tempo().unwrap().micros_per_beat(), 15_000_000);
}
