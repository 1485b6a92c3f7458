//! Synthetic sample clouds shared by the integration tests

#![allow(dead_code)]

use nalgebra::{Rotation3, Vector3};

/// `n` points spread evenly over an ellipsoid (Fibonacci lattice on the unit
/// sphere, stretched by `radii`, rotated, then shifted to `center`)
pub fn ellipsoid_samples(
    center: Vector3<f64>,
    radii: Vector3<f64>,
    rotation: Rotation3<f64>,
    n: usize,
) -> Vec<Vector3<f64>> {
    let golden = std::f64::consts::PI * (3.0 - 5.0f64.sqrt());
    (0..n)
        .map(|k| {
            let z = 1.0 - 2.0 * (k as f64 + 0.5) / n as f64;
            let r = (1.0 - z * z).sqrt();
            let theta = golden * k as f64;
            let unit = Vector3::new(r * theta.cos(), r * theta.sin(), z);
            center + rotation * unit.component_mul(&radii)
        })
        .collect()
}

/// Unique path in the system temp directory for a test file
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "magcal-ellipsoid-{}-{}.txt",
        std::process::id(),
        name
    ))
}
