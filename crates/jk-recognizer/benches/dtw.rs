//! DTW and classification benchmarks.
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package jk-recognizer --bench dtw
//! ```
//!
//! # Metrics Measured
//! - Banded DTW latency across resample counts and band widths
//! - End-to-end classification latency against a 16-template recognizer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jk_models::{Sample, SampleLabels};
use jk_recognizer::dtw::{band_width, dtw_distance};
use jk_recognizer::template::vectorize;
use jk_recognizer::{resample, Recognizer};
use ndarray::Array2;
use std::time::Duration;

/// Lissajous-style test curve in `dimension` axes.
fn curve(points: usize, dimension: usize, phase: f64) -> Array2<f64> {
    Array2::from_shape_fn((points, dimension), |(i, axis)| {
        let t = i as f64 / points as f64 * std::f64::consts::TAU;
        ((axis + 1) as f64 * t + phase).sin()
    })
}

fn sample(gesture: &str, phase: f64) -> Sample {
    let trajectory = curve(90, 3, phase);
    let timestamps = (0..trajectory.nrows()).map(|i| i as f64 / 30.0).collect();
    Sample::new(SampleLabels::gesture(gesture), trajectory, timestamps).expect("valid benchmark sample")
}

/// Benchmark raw banded DTW.
fn bench_dtw(c: &mut Criterion) {
    let mut group = c.benchmark_group("dtw");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for n in [16, 32, 64, 96] {
        let a = vectorize(resample(curve(120, 3, 0.0).view(), n).expect("resample").view());
        let b = vectorize(resample(curve(120, 3, 0.4).view(), n).expect("resample").view());

        for ratio in [0.1, 0.5, 1.0] {
            let band = band_width(n, ratio);
            group.throughput(Throughput::Elements(1));
            group.bench_with_input(
                BenchmarkId::new(format!("n{}", n), format!("ratio{}", ratio)),
                &(&a, &b),
                |bench, (a, b)| bench.iter(|| black_box(dtw_distance(a.view(), b.view(), black_box(band)))),
            );
        }
    }

    group.finish();
}

/// Benchmark classification against a populated recognizer.
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for n in [16, 32, 64] {
        let mut recognizer = Recognizer::new(n, 0.1).expect("recognizer");
        for i in 0..16 {
            let gesture = if i % 2 == 0 { "even" } else { "odd" };
            recognizer
                .add_template(sample(gesture, i as f64 * 0.2))
                .expect("add template");
        }
        let candidate = sample("candidate", 0.1);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("templates16", n), &candidate, |bench, candidate| {
            bench.iter(|| black_box(recognizer.classify(black_box(candidate))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dtw, bench_classify);
criterion_main!(benches);
