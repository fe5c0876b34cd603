//! Criterion micro-benchmarks for the sensor beam.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rover_core::Point;
use rover_sense::{CollisionDetector, Sensor};
use rover_test_utils::{seeded_rng, walled_arena};

/// Benchmark: a full-length beam that hits nothing.
fn bench_scan_miss(c: &mut Criterion) {
    let arena = walled_arena();
    let det = CollisionDetector::new(&arena);
    let sensor = Sensor::default();
    let mut rng = seeded_rng(0);
    c.bench_function("scan_miss", |b| {
        b.iter(|| black_box(sensor.scan(&det, Point::new(400, 250), 0.0, &mut rng)));
    });
}

/// Benchmark: a beam that hits the right wall after 16 samples.
fn bench_scan_hit(c: &mut Criterion) {
    let arena = walled_arena();
    let det = CollisionDetector::new(&arena);
    let sensor = Sensor::default();
    let mut rng = seeded_rng(0);
    c.bench_function("scan_hit_wall", |b| {
        b.iter(|| black_box(sensor.scan(&det, Point::new(700, 250), 0.0, &mut rng)));
    });
}

criterion_group!(benches, bench_scan_miss, bench_scan_hit);
criterion_main!(benches);
