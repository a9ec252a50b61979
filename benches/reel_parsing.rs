//! Benchmarks for reading and writing shot lists
//!
//! Covers line filtering, classification and the full timeline build with a
//! prober that never spawns a process.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reelforge_probe::DryRunProber;
use reelforge_reel::{
    classify, filter, read_reel, write_timeline, ReaderConfig, TimelineBuilder, WriterConfig,
};

/// A shot list with `shots` shots, every third one with an attached audio
/// file and every fifth one a black gap.
fn shot_list(shots: usize) -> String {
    let mut text = String::from("#\n# generated\n#\n\nVersion 4.0\nGhosting 5 5\n");
    for i in 0..shots {
        if i % 5 == 4 {
            text.push_str("\"Black Gap\" 1 24 1 24 24\n");
            continue;
        }
        text.push_str(&format!("\"/shots/sh{i:04}.mov\" 1 120 9 112 24\n"));
        if i % 3 == 0 {
            text.push_str(&format!("audio: /sound/sh{i:04}.wav\naudio offset: 4\n"));
        }
    }
    text.push_str("EDL\n");
    text
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for shots in [10, 100, 1000] {
        let text = shot_list(shots);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(shots), &text, |b, text| {
            b.iter(|| filter(black_box(text)))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    let lines = [
        ("shot_two_numbers", "\"/shots/a.mov\" 1 120"),
        ("shot_full", "\"/shots/a.mov\" 1 120 9 112 23.976"),
        ("placeholder", "\"Black Gap\" 1 24 24"),
        ("audio", "audio: /sound/dialog.wav"),
        ("audio_offset", "audio offset: 12"),
        ("malformed", "\"/shots/a.mov\" one two"),
    ];

    for (name, line) in lines {
        group.bench_function(name, |b| b.iter(|| classify(black_box(line))));
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_timeline");
    let prober = DryRunProber::new().with_streams(1, 2).with_audio(1, 60.0);
    let config = ReaderConfig::new("bench").with_base_dir("/project");

    for shots in [10, 100, 1000] {
        let text = shot_list(shots);
        group.throughput(Throughput::Elements(shots as u64));
        group.bench_with_input(BenchmarkId::from_parameter(shots), &text, |b, text| {
            b.iter(|| {
                TimelineBuilder::new(config.clone(), &prober)
                    .build(black_box(text))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_timeline");
    let prober = DryRunProber::new().with_streams(1, 2).with_audio(1, 60.0);
    let reader = ReaderConfig::new("bench").with_base_dir("/project");
    let writer = WriterConfig::new();

    for shots in [10, 100, 1000] {
        let timeline = read_reel(&shot_list(shots), &reader, &prober).unwrap().value;
        group.throughput(Throughput::Elements(shots as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(shots),
            &timeline,
            |b, timeline| b.iter(|| write_timeline(black_box(timeline), &writer).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filter, bench_classify, bench_build, bench_write);
criterion_main!(benches);
