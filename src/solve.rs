//! Reduction of fitted quadric coefficients to hard-iron and soft-iron corrections

use log::debug;
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::error::{CalibrationError, Result, SingularStage};
use crate::math::{quadric_matrix, symmetric_eigen_ascending};
use crate::types::{CalibrationResult, QuadricCoefficients};

/// Solve for the calibration that maps the fitted ellipsoid onto a sphere
///
/// 1. Assemble the homogeneous quadric matrix `A` and locate the center
///    `c = -Q⁻¹·[g, h, i]` where `Q` is its upper-left 3x3 block.
/// 2. Translate `A` to the center, giving `R = T·A·Tᵗ`, and normalise the
///    shape to `S = R₃ₓ₃ / -R₄₄` so that centered surface points satisfy
///    `pᵗ·S·p = 1`.
/// 3. Eigen-decompose `S`. Each eigenvalue `λ` gives a semi-axis `1/√λ`.
/// 4. Scale every axis down to the shortest one: the compensation matrix is
///    `V · diag(rmin/rₖ) · Vᵗ`.
///
/// Eigenvalues are sorted ascending, so [`CalibrationResult::radii`] lists the
/// longest axis first.
///
/// # Errors
/// * [`CalibrationError::SingularSystem`] when `Q` cannot be inverted
/// * [`CalibrationError::NonEllipsoid`] when `S` is not positive definite,
///   e.g. a hyperboloid fitted to a poorly spread or noisy cloud
///
/// Nothing is returned unless every step succeeds.
pub fn solve_calibration(quadric: &QuadricCoefficients) -> Result<CalibrationResult> {
    let a = quadric_matrix(quadric);

    let center = quadric
        .quadratic_block()
        .try_inverse()
        .map(|inverse| -(inverse * quadric.linear_terms()))
        .filter(|c| c.iter().all(|v| v.is_finite()))
        .ok_or(CalibrationError::SingularSystem(SingularStage::CenterBlock))?;

    let translation = translation_matrix(&center);
    let reduced = translation * a * translation.transpose();
    let shape: Matrix3<f64> = reduced.fixed_view::<3, 3>(0, 0).into_owned();
    let level = -reduced[(3, 3)];

    if level == 0.0 || !level.is_finite() {
        let (eigenvalues, _) = symmetric_eigen_ascending(shape);
        return Err(non_ellipsoid(&eigenvalues));
    }

    let (eigenvalues, axes) = symmetric_eigen_ascending(shape / level);
    if eigenvalues.iter().any(|l| l.is_nan() || *l <= 0.0) {
        debug!("quadric eigenvalues {:?} are not all positive", eigenvalues.as_slice());
        return Err(non_ellipsoid(&eigenvalues));
    }

    let radii = eigenvalues.map(|l| (1.0 / l).sqrt());
    let shortest = radii.min();
    let scale = Matrix3::from_diagonal(&radii.map(|r| shortest / r));
    let compensation = axes * scale * axes.transpose();

    debug!(
        "solved center [{:.4}, {:.4}, {:.4}], radii [{:.4}, {:.4}, {:.4}]",
        center.x, center.y, center.z, radii.x, radii.y, radii.z
    );

    Ok(CalibrationResult {
        center,
        compensation,
        radii,
        axes,
    })
}

/// Homogeneous transform whose last row carries the center
fn translation_matrix(center: &Vector3<f64>) -> Matrix4<f64> {
    let mut t = Matrix4::identity();
    t[(3, 0)] = center.x;
    t[(3, 1)] = center.y;
    t[(3, 2)] = center.z;
    t
}

fn non_ellipsoid(eigenvalues: &Vector3<f64>) -> CalibrationError {
    CalibrationError::NonEllipsoid {
        eigenvalues: [eigenvalues.x, eigenvalues.y, eigenvalues.z],
    }
}
