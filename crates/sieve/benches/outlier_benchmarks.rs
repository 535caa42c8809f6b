//! Outlier, transform and scaling performance benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sieve::outliers::{IqrDetector, OutlierDetector, PercentileDetector, ZScoreDetector};
use sieve::{
    Column, Dataset, DistributionTransform, OutlierEngine, ScalingEngine, ScalingMethod,
    TransformEngine,
};

/// One skewed positive column with occasional extreme values.
fn generate_data(rows: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<Option<f64>> = (0..rows)
        .map(|_| {
            let x: f64 = rng.gen_range(0.0..1.0);
            if rng.gen_bool(0.01) {
                Some(1_000.0 + x * 1_000.0)
            } else {
                Some((x * 3.0).exp())
            }
        })
        .collect();
    Dataset::new(vec![Column::numeric("x", values)]).unwrap()
}

fn bench_treatments(c: &mut Criterion) {
    let mut group = c.benchmark_group("outlier_treatment");
    let engine = OutlierEngine::new();
    let detectors: [(&str, Box<dyn OutlierDetector>); 3] = [
        ("z_score", Box::new(ZScoreDetector::default())),
        ("iqr", Box::new(IqrDetector::default())),
        ("percentile", Box::new(PercentileDetector::default())),
    ];

    for rows in [1_000, 10_000, 100_000].iter() {
        let data = generate_data(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        for (name, detector) in &detectors {
            group.bench_with_input(BenchmarkId::new(*name, rows), &data, |b, data| {
                b.iter(|| black_box(engine.trim_and_cap(data, &["x"], detector.as_ref()).unwrap()))
            });
        }
    }

    group.finish();
}

fn bench_power_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("power_transform");
    group.sample_size(20);
    let engine = TransformEngine::new();

    for rows in [1_000, 10_000].iter() {
        let data = generate_data(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        for transform in [DistributionTransform::BoxCox, DistributionTransform::YeoJohnson] {
            group.bench_with_input(BenchmarkId::new(transform.to_string(), rows), &data, |b, data| {
                b.iter(|| black_box(engine.apply(data, &["x"], transform).unwrap()))
            });
        }
    }

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let engine = ScalingEngine::new();
    let data = generate_data(100_000);
    group.throughput(Throughput::Elements(100_000));

    for method in [ScalingMethod::Standard, ScalingMethod::MinMax, ScalingMethod::Robust] {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| black_box(engine.scale(&data, &["x"], method).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_treatments, bench_power_transforms, bench_scaling);
criterion_main!(benches);
