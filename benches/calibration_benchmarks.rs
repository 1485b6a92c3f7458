use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use magcal_ellipsoid::{CalibrationSession, compensate, fit_ellipsoid, solve_calibration};
use nalgebra::{Rotation3, Vector3};
use rand::prelude::*;
use rand_pcg::Pcg64;
use std::f64::consts::PI;

/// Noisy readings from a magnetometer tumbled through random orientations
fn generate_samples(count: usize, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let center = Vector3::new(18.0, -7.5, 31.0);
    let radii = Vector3::new(52.0, 46.0, 39.0);
    let rotation = Rotation3::from_euler_angles(0.3, -0.2, 0.8);

    (0..count)
        .map(|_| {
            let z: f64 = rng.random_range(-1.0..1.0);
            let theta: f64 = rng.random_range(0.0..2.0 * PI);
            let r = (1.0 - z * z).sqrt();
            let unit = Vector3::new(r * theta.cos(), r * theta.sin(), z);
            let noise = Vector3::new(
                rng.random_range(-0.3..0.3),
                rng.random_range(-0.3..0.3),
                rng.random_range(-0.3..0.3),
            );
            center + rotation * unit.component_mul(&radii) + noise
        })
        .collect()
}

/// Benchmark the least-squares fit for typical collection sizes
fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_ellipsoid");
    for &count in &[50usize, 500, 5000] {
        let samples = generate_samples(count, 42);
        group.bench_with_input(BenchmarkId::from_parameter(count), &samples, |b, s| {
            b.iter(|| fit_ellipsoid(black_box(s)))
        });
    }
    group.finish();
}

/// Benchmark reduction of fitted coefficients to a calibration
fn bench_solve(c: &mut Criterion) {
    let quadric = fit_ellipsoid(&generate_samples(500, 7)).unwrap();

    c.bench_function("solve_calibration", |b| {
        b.iter(|| solve_calibration(black_box(&quadric)))
    });
}

/// Benchmark applying a calibration to a single reading
fn bench_compensate(c: &mut Criterion) {
    let samples = generate_samples(500, 11);
    let result = solve_calibration(&fit_ellipsoid(&samples).unwrap()).unwrap();
    let raw = samples[0];

    c.bench_function("compensate", |b| {
        b.iter(|| compensate(black_box(raw), black_box(&result)))
    });
}

/// Benchmark a full session recalculation
fn bench_session_recalculate(c: &mut Criterion) {
    let mut session = CalibrationSession::new();
    for s in generate_samples(1000, 3) {
        session.add(s);
    }

    c.bench_function("session_recalculate_1000", |b| {
        b.iter(|| black_box(session.recalculate()))
    });
}

criterion_group!(
    benches,
    bench_fit,
    bench_solve,
    bench_compensate,
    bench_session_recalculate
);

criterion_main!(benches);
