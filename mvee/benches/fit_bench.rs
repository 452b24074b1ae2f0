//! Benchmarks for fitting ellipsoids.
use std::{f64::consts::FRAC_PI_4, hint::black_box};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mvee::{Config, EllipseParams, Parallelism, PointSet, fit};

const FIRST: EllipseParams = EllipseParams {
    a: 1.0,
    b: 1.0,
    x0: 0.0,
    y0: 0.0,
    phi: 0.0,
};
const SECOND: EllipseParams = EllipseParams {
    a: 1.2,
    b: 0.95,
    x0: -1.0,
    y0: -0.4,
    phi: FRAC_PI_4,
};

/// `points_per_ellipse` points from each of two overlapping ellipses.
fn two_ellipses(points_per_ellipse: usize) -> PointSet {
    let sets: Vec<PointSet> = [FIRST, SECOND]
        .iter()
        .map(|e| PointSet::from_rows(&e.sample_boundary(points_per_ellipse)).unwrap())
        .collect();
    PointSet::interleave(&sets).unwrap()
}

/// Already optimal after one iteration, so this is mostly setup and extraction.
fn fit_circle(c: &mut Criterion) {
    let points = PointSet::from_rows(&FIRST.sample_boundary(100)).unwrap();
    c.bench_function("fit_circle", |b| {
        b.iter(|| {
            let _actual = black_box(fit(&points, Config::default()).unwrap());
        });
    });
}

fn fit_two_ellipses(c: &mut Criterion) {
    let points = two_ellipses(50);
    c.bench_function("fit_two_ellipses", |b| {
        b.iter(|| {
            let _actual = black_box(fit(&points, Config::default()).unwrap());
        });
    });
}

fn fit_many_points(c: &mut Criterion) {
    for (name, parallelism) in [
        ("sequential", Parallelism::Sequential),
        ("rayon", Parallelism::Rayon),
    ] {
        let mut group = c.benchmark_group(format!("fit_many_points_{name}"));
        for num_points in [1_000u64, 10_000] {
            let points = two_ellipses(num_points as usize / 2);
            let config = Config::default()
                .with_tolerance(1e-2)
                .with_parallelism(parallelism);
            group.throughput(Throughput::Elements(num_points));
            group.bench_with_input(
                BenchmarkId::from_parameter(num_points),
                &points,
                |b, points| {
                    b.iter(|| {
                        let _actual = black_box(fit(points, config).unwrap());
                    });
                },
            );
        }
        group.finish();
    }
}

criterion_group!(benches, fit_circle, fit_two_ellipses, fit_many_points);
criterion_main!(benches);
