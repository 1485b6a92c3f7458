//! Core types and settings for the calibration engine

use nalgebra::{Matrix3, SVector, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of free coefficients in a general quadric surface
pub const QUADRIC_COEFFICIENTS: usize = 9;

/// Raw or calibrated 3-axis magnetic field reading
///
/// Any consistent unit works (µT, gauss, raw counts). Samples carry no
/// identity beyond their position in a [`SampleStore`](crate::SampleStore).
pub type Sample = Vector3<f64>;

/// Coefficients of the general quadric
/// `a·x² + b·y² + c·z² + 2d·xy + 2e·xz + 2f·yz + 2g·x + 2h·y + 2i·z = 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadricCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub i: f64,
}

impl QuadricCoefficients {
    /// Build from a least-squares solution vector ordered `[a, b, c, d, e, f, g, h, i]`
    pub fn from_vector(v: &SVector<f64, QUADRIC_COEFFICIENTS>) -> Self {
        Self {
            a: v[0],
            b: v[1],
            c: v[2],
            d: v[3],
            e: v[4],
            f: v[5],
            g: v[6],
            h: v[7],
            i: v[8],
        }
    }

    /// Coefficients ordered `[a, b, c, d, e, f, g, h, i]`
    pub fn to_array(&self) -> [f64; QUADRIC_COEFFICIENTS] {
        [
            self.a, self.b, self.c, self.d, self.e, self.f, self.g, self.h, self.i,
        ]
    }

    /// Symmetric 3x3 block of the second-degree terms
    pub fn quadratic_block(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.a, self.d, self.e, //
            self.d, self.b, self.f, //
            self.e, self.f, self.c,
        )
    }

    /// Linear terms `[g, h, i]`
    pub fn linear_terms(&self) -> Vector3<f64> {
        Vector3::new(self.g, self.h, self.i)
    }

    /// Left-hand side of the quadric equation at `point`
    ///
    /// Equals 1.0 for points lying on the surface.
    pub fn evaluate(&self, point: &Sample) -> f64 {
        let (x, y, z) = (point.x, point.y, point.z);
        self.a * x * x
            + self.b * y * y
            + self.c * z * z
            + 2.0 * (self.d * x * y + self.e * x * z + self.f * y * z)
            + 2.0 * (self.g * x + self.h * y + self.i * z)
    }
}

/// Solved hard-iron and soft-iron calibration
///
/// Only produced by a successful solve, so every field is always populated.
/// Eigen quantities are ordered by ascending eigenvalue, which means the
/// largest radius comes first.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationResult {
    pub(crate) center: Vector3<f64>,
    pub(crate) compensation: Matrix3<f64>,
    pub(crate) radii: Vector3<f64>,
    pub(crate) axes: Matrix3<f64>,
}

impl CalibrationResult {
    /// Hard-iron bias (the ellipsoid center)
    pub fn center(&self) -> Vector3<f64> {
        self.center
    }

    /// Symmetric soft-iron correction matrix
    pub fn compensation(&self) -> Matrix3<f64> {
        self.compensation
    }

    /// Ellipsoid semi-axis lengths, largest first
    pub fn radii(&self) -> Vector3<f64> {
        self.radii
    }

    /// Orthonormal ellipsoid axes as columns, in the same order as [`radii`](Self::radii)
    pub fn axes(&self) -> Matrix3<f64> {
        self.axes
    }

    /// Radius of the sphere that compensated samples lie on (the smallest radius)
    pub fn field_strength(&self) -> f64 {
        self.radii.min()
    }

    /// Apply this calibration to a raw sample
    pub fn apply(&self, raw: Sample) -> Sample {
        crate::calibration::compensate(raw, self)
    }

    /// Center and row-major compensation matrix as flat arrays
    pub fn to_arrays(&self) -> ([f64; 3], [f64; 9]) {
        let m = &self.compensation;
        (
            [self.center.x, self.center.y, self.center.z],
            [
                m[(0, 0)],
                m[(0, 1)],
                m[(0, 2)],
                m[(1, 0)],
                m[(1, 1)],
                m[(1, 2)],
                m[(2, 0)],
                m[(2, 1)],
                m[(2, 2)],
            ],
        )
    }

    /// The 12 values that go into the vehicle configuration record
    pub fn to_config(&self) -> MagCalConfig {
        MagCalConfig::from(self)
    }
}

/// Magnetometer calibration fields of the vehicle configuration record
///
/// Stored as `f32`, matching the width of the fields on the vehicle. The
/// engine only produces these values; serializing and transmitting the
/// enclosing record is left to the caller.
///
/// # Example
/// ```
/// use magcal_ellipsoid::MagCalConfig;
///
/// let config = MagCalConfig::default();
/// assert_eq!(config.xx, 1.0);
/// assert_eq!(config.cx, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MagCalConfig {
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    pub xx: f32,
    pub xy: f32,
    pub xz: f32,
    pub yx: f32,
    pub yy: f32,
    pub yz: f32,
    pub zx: f32,
    pub zy: f32,
    pub zz: f32,
}

impl MagCalConfig {
    /// Center as a vector
    pub fn center(&self) -> Vector3<f32> {
        Vector3::new(self.cx, self.cy, self.cz)
    }

    /// Compensation matrix
    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new(
            self.xx, self.xy, self.xz, //
            self.yx, self.yy, self.yz, //
            self.zx, self.zy, self.zz,
        )
    }
}

/// Identity calibration: zero bias, unit matrix
impl Default for MagCalConfig {
    fn default() -> Self {
        Self {
            cx: 0.0,
            cy: 0.0,
            cz: 0.0,
            xx: 1.0,
            xy: 0.0,
            xz: 0.0,
            yx: 0.0,
            yy: 1.0,
            yz: 0.0,
            zx: 0.0,
            zy: 0.0,
            zz: 1.0,
        }
    }
}

impl From<&CalibrationResult> for MagCalConfig {
    fn from(result: &CalibrationResult) -> Self {
        let (c, m) = result.to_arrays();
        Self {
            cx: c[0] as f32,
            cy: c[1] as f32,
            cz: c[2] as f32,
            xx: m[0] as f32,
            xy: m[1] as f32,
            xz: m[2] as f32,
            yx: m[3] as f32,
            yy: m[4] as f32,
            yz: m[5] as f32,
            zx: m[6] as f32,
            zy: m[7] as f32,
            zz: m[8] as f32,
        }
    }
}

/// Ellipsoid fit settings
///
/// # Example
/// ```
/// use magcal_ellipsoid::FitSettings;
///
/// let settings = FitSettings {
///     min_samples: 50,        // demand a better spread before fitting
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitSettings {
    /// Minimum number of samples before a fit is attempted
    ///
    /// Values below 9 are treated as 9, since a general quadric has nine
    /// free coefficients.
    pub min_samples: usize,
    /// Smallest admissible ratio between the smallest and largest eigenvalue
    /// of the normal matrix `DᵗD`, taken after scaling the design matrix
    /// columns to unit norm
    ///
    /// The default sits at rounding level: planar, collinear or otherwise
    /// degenerate clouds fall below it and are reported as singular rather
    /// than producing meaningless coefficients. Raise it to also reject
    /// clouds that are merely ill-conditioned.
    pub condition_limit: f64,
}

impl FitSettings {
    /// Effective minimum sample count
    pub fn required_samples(&self) -> usize {
        self.min_samples.max(QUADRIC_COEFFICIENTS)
    }
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            min_samples: QUADRIC_COEFFICIENTS,
            condition_limit: 1e-15,
        }
    }
}

/// Calibration session settings
///
/// # Example
/// ```
/// use magcal_ellipsoid::{CalibrationSession, SessionSettings};
///
/// let settings = SessionSettings {
///     invalidate_on_add: true,    // drop the cached result whenever samples arrive
///     ..Default::default()
/// };
/// let session = CalibrationSession::with_settings(settings);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionSettings {
    /// Settings forwarded to the ellipsoid fit
    pub fit: FitSettings,
    /// Discard the cached result when samples are added after a fit
    ///
    /// Off by default: the cached result stays until the session is cleared
    /// or explicitly recalculated.
    pub invalidate_on_add: bool,
    /// Whether telemetry passed to `record` is stored
    pub collecting: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            fit: FitSettings::default(),
            invalidate_on_add: false,
            collecting: true,
        }
    }
}

/// Lifecycle state of a calibration session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No samples and no result
    #[default]
    Empty,
    /// Samples present, no cached result
    Collecting,
    /// A cached result exists
    Fitted,
}
