//! Least-squares fit of a general quadric to a magnetometer sample cloud

use log::debug;
use nalgebra::{DVector, Dyn, OMatrix, U9};

use crate::error::{CalibrationError, Result, SingularStage};
use crate::types::{FitSettings, QuadricCoefficients, Sample};

/// Fit a general quadric to `samples` with default settings
///
/// See [`fit_ellipsoid_with`].
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magcal_ellipsoid::fit_ellipsoid;
///
/// // Points on a sphere of radius 2 centered at the origin
/// let samples = vec![
///     Vector3::new(2.0, 0.0, 0.0), Vector3::new(-2.0, 0.0, 0.0),
///     Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, -2.0, 0.0),
///     Vector3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -2.0),
///     Vector3::new(1.2, 1.6, 0.0), Vector3::new(0.0, 1.2, -1.6),
///     Vector3::new(-1.6, 0.0, 1.2), Vector3::new(1.0, 1.0, 2.0f64.sqrt()),
/// ];
///
/// let quadric = fit_ellipsoid(&samples).unwrap();
/// assert!((quadric.a - 0.25).abs() < 1e-9);
/// ```
pub fn fit_ellipsoid(samples: &[Sample]) -> Result<QuadricCoefficients> {
    fit_ellipsoid_with(samples, &FitSettings::default())
}

/// Fit a general quadric to `samples`
///
/// Builds the `n x 9` design matrix `D` whose rows are
/// `[x², y², z², 2xy, 2xz, 2yz, 2x, 2y, 2z]` and solves the normal equations
/// `(DᵗD)·v = Dᵗ·1`. The constant term of the quadric is thereby fixed at -1.
///
/// The fit is a direct solve: the same samples in the same order always give
/// bit-identical coefficients.
///
/// # Errors
/// * [`CalibrationError::InsufficientSamples`] with fewer than
///   [`FitSettings::required_samples`] samples
/// * [`CalibrationError::SingularSystem`] when `DᵗD` is not invertible. The
///   check runs on `DᵗD` with the columns of `D` scaled to unit norm, so it
///   is independent of the sample unit; the scaled matrix is rejected when its
///   eigenvalue spread exceeds [`FitSettings::condition_limit`]. Planar and
///   collinear clouds, as well as non-finite readings, end up here.
pub fn fit_ellipsoid_with(samples: &[Sample], settings: &FitSettings) -> Result<QuadricCoefficients> {
    let required = settings.required_samples();
    if samples.len() < required {
        return Err(CalibrationError::InsufficientSamples {
            required,
            actual: samples.len(),
        });
    }

    let design = design_matrix(samples);
    let ones = DVector::<f64>::from_element(samples.len(), 1.0);

    let normal = design.tr_mul(&design);
    let rhs = design.tr_mul(&ones);

    if normal.iter().chain(rhs.iter()).any(|v| !v.is_finite()) {
        debug!("normal equations contain non-finite values");
        return Err(CalibrationError::SingularSystem(SingularStage::NormalEquations));
    }

    // Scale every column of D to unit norm so the conditioning check and the
    // solve do not depend on the sample unit or on the hard-iron offset.
    let diagonal = normal.diagonal();
    if diagonal.iter().any(|d| *d <= 0.0) {
        debug!("fit: a design matrix column is identically zero");
        return Err(CalibrationError::SingularSystem(SingularStage::NormalEquations));
    }
    let scale = diagonal.map(|d| d.sqrt().recip());
    let scaled = normal.component_mul(&(scale * scale.transpose()));

    // The scaled matrix is symmetric positive semi-definite, so its eigenvalue
    // spread is its condition number.
    let spectrum = scaled.symmetric_eigen().eigenvalues;
    let (smallest, largest) = (spectrum.min(), spectrum.max());
    debug!(
        "fit: {} samples, scaled normal matrix eigenvalues in [{:e}, {:e}]",
        samples.len(),
        smallest,
        largest
    );
    if largest <= 0.0 || smallest <= largest * settings.condition_limit {
        return Err(CalibrationError::SingularSystem(SingularStage::NormalEquations));
    }

    let solution = scaled
        .lu()
        .solve(&rhs.component_mul(&scale))
        .map(|v| v.component_mul(&scale))
        .filter(|v| v.iter().all(|c| c.is_finite()))
        .ok_or(CalibrationError::SingularSystem(SingularStage::NormalEquations))?;

    Ok(QuadricCoefficients::from_vector(&solution))
}

/// One row `[x², y², z², 2xy, 2xz, 2yz, 2x, 2y, 2z]` per sample
fn design_matrix(samples: &[Sample]) -> OMatrix<f64, Dyn, U9> {
    OMatrix::<f64, Dyn, U9>::from_fn(samples.len(), |row, col| {
        let s = &samples[row];
        match col {
            0 => s.x * s.x,
            1 => s.y * s.y,
            2 => s.z * s.z,
            3 => 2.0 * s.x * s.y,
            4 => 2.0 * s.x * s.z,
            5 => 2.0 * s.y * s.z,
            6 => 2.0 * s.x,
            7 => 2.0 * s.y,
            _ => 2.0 * s.z,
        }
    })
}
