//! Application of solved magnetometer calibrations to raw readings

use nalgebra::{Matrix3, Vector3};

use crate::types::{CalibrationResult, Sample};

/// Applies magnetometer calibration (hard and soft iron correction)
///
/// # Arguments
/// * `uncalibrated` - Raw magnetometer reading
/// * `soft_iron_matrix` - 3x3 soft iron correction matrix
/// * `hard_iron_offset` - Hard iron offset vector
///
/// # Returns
/// Calibrated magnetometer reading
///
/// # Example
/// ```
/// use nalgebra::{Matrix3, Vector3};
/// use magcal_ellipsoid::calibration::calibrate_magnetic;
///
/// let raw = Vector3::new(100.0, 200.0, 300.0);
/// let soft_iron = Matrix3::identity();
/// let hard_iron = Vector3::new(10.0, 20.0, 30.0);
///
/// let calibrated = calibrate_magnetic(raw, soft_iron, hard_iron);
/// ```
pub fn calibrate_magnetic(
    uncalibrated: Vector3<f64>,
    soft_iron_matrix: Matrix3<f64>,
    hard_iron_offset: Vector3<f64>,
) -> Vector3<f64> {
    soft_iron_matrix * (uncalibrated - hard_iron_offset)
}

/// Map a raw sample onto the calibrated sphere: `compensation · (raw - center)`
pub fn compensate(raw: Sample, result: &CalibrationResult) -> Sample {
    calibrate_magnetic(raw, result.compensation, result.center)
}

/// Compensate every sample, keeping their order
pub fn compensate_all(samples: &[Sample], result: &CalibrationResult) -> Vec<Sample> {
    samples.iter().map(|s| compensate(*s, result)).collect()
}
