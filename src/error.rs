//! Error types for the calibration engine

use thiserror::Error;

/// Which matrix inversion failed during a calibration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingularStage {
    /// The 9x9 normal equations `(DᵗD)·v = Dᵗ·1` of the ellipsoid fit
    NormalEquations,
    /// The 3x3 quadratic block used to locate the ellipsoid center
    CenterBlock,
}

impl core::fmt::Display for SingularStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SingularStage::NormalEquations => f.write_str("normal equations"),
            SingularStage::CenterBlock => f.write_str("center block"),
        }
    }
}

/// Errors returned by the calibration engine
///
/// Every fallible operation either commits its whole result or leaves the
/// previous state untouched, so any of these can be handled by collecting
/// more samples and trying again.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Fit attempted with fewer samples than a general quadric needs
    #[error("insufficient samples: {actual} collected, at least {required} required")]
    InsufficientSamples { required: usize, actual: usize },

    /// A line of a sample file did not hold exactly three numbers
    #[error("malformed sample on line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// The sample file could not be read or written
    #[error("sample file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A matrix that must be inverted is singular or too badly conditioned
    #[error("singular system in {0}")]
    SingularSystem(SingularStage),

    /// The fitted quadric is not a proper ellipsoid
    #[error("fitted quadric is not an ellipsoid (eigenvalues {eigenvalues:?})")]
    NonEllipsoid { eigenvalues: [f64; 3] },
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, CalibrationError>;
