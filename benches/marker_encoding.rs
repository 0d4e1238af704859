//! Benchmarks for marker track encoding
//!
//! Tick conversion, serialization and parsing for short and feature-length
//! boundary lists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scenemark_smf::{deserialize, serialize, tick_deltas, vlq, FrameRate, MarkerTrackBuilder};

/// Roughly one cut every four seconds at 23.976 fps.
fn feature_boundaries(scenes: u64) -> Vec<u64> {
    (0..scenes).map(|i| i * 96 + (i * 7) % 13).collect()
}

fn ntsc_film() -> FrameRate {
    FrameRate::new(24000, 1001).unwrap()
}

fn bench_vlq(c: &mut Criterion) {
    let mut group = c.benchmark_group("vlq");

    for value in [0x40u64, 0x3FFF, 0x1F_FFFF, 0x0FFF_FFFF] {
        group.bench_with_input(BenchmarkId::new("encode", value), &value, |b, &v| {
            b.iter(|| vlq::encode(black_box(v)).unwrap());
        });

        let encoded = vlq::encode(value).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", value), &encoded, |b, bytes| {
            b.iter(|| vlq::decode(black_box(bytes), 0).unwrap());
        });
    }

    group.finish();
}

fn bench_tick_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_deltas");

    for scenes in [5u64, 500, 5000] {
        let frames = feature_boundaries(scenes);
        group.throughput(Throughput::Elements(scenes));
        group.bench_with_input(BenchmarkId::from_parameter(scenes), &frames, |b, frames| {
            b.iter(|| tick_deltas(black_box(frames), ntsc_film(), 960).unwrap());
        });
    }

    group.finish();
}

fn bench_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("container");

    for scenes in [5u64, 500, 5000] {
        let frames = feature_boundaries(scenes);
        let track = MarkerTrackBuilder::new().build(&frames, ntsc_film()).unwrap();
        let bytes = serialize(&track, 960).unwrap();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("serialize", scenes), &track, |b, track| {
            b.iter(|| serialize(black_box(track), 960).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("deserialize", scenes), &bytes, |b, bytes| {
            b.iter(|| deserialize(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vlq, bench_tick_conversion, bench_container);
criterion_main!(benches);
