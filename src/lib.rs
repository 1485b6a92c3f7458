//! Magnetometer calibration by least-squares ellipsoid fitting
//!
//! A magnetometer rotated through every orientation should trace a sphere
//! centered at the origin. Nearby magnetized material shifts that sphere
//! (hard-iron bias) and ferrous material stretches it into an ellipsoid
//! (soft-iron distortion). This crate fits a general ellipsoid to a cloud of
//! raw samples and solves for the bias vector and symmetric correction matrix
//! that map raw readings back onto a sphere.
//!
//! # Pipeline
//!
//! - [`SampleStore`] collects raw samples and reads/writes the plain-text sample format
//! - [`fit_ellipsoid`] fits the quadric `a·x² + … + 2i·z = 1` by least squares
//! - [`solve_calibration`] reduces the quadric to a center and compensation matrix
//! - [`calibration::compensate`] applies a solved [`CalibrationResult`] to new readings
//! - [`CalibrationSession`] ties these together with a cached, lazily computed result
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use magcal_ellipsoid::CalibrationSession;
//!
//! let mut session = CalibrationSession::new();
//!
//! // Readings collected while rotating the vehicle (µT)
//! for k in 0..200 {
//!     let z = 1.0 - 2.0 * (k as f64 + 0.5) / 200.0;
//!     let r = (1.0 - z * z).sqrt();
//!     let theta = 2.399963 * k as f64;
//!     let unit = Vector3::new(r * theta.cos(), r * theta.sin(), z);
//!     let raw = Vector3::new(48.0 * unit.x, 40.0 * unit.y, 35.0 * unit.z)
//!         + Vector3::new(5.0, -12.0, 20.0);
//!     session.add(raw);
//! }
//!
//! let result = session.get_or_compute().unwrap();
//! let calibrated = result.apply(Vector3::new(53.0, -12.0, 20.0));
//! assert!((calibrated.magnitude() - 35.0).abs() < 1e-6);
//!
//! // Values for the vehicle configuration record
//! let config = result.to_config();
//! println!("center: {} {} {}", config.cx, config.cy, config.cz);
//! ```

pub mod calibration;
mod error;
mod fit;
mod math;
mod session;
mod solve;
mod store;
mod types;

// Re-export all public types and functions
pub use calibration::{calibrate_magnetic, compensate, compensate_all};
pub use error::{CalibrationError, Result, SingularStage};
pub use fit::{fit_ellipsoid, fit_ellipsoid_with};
pub use math::{quadric_matrix, symmetric_eigen_ascending};
pub use session::CalibrationSession;
pub use solve::solve_calibration;
pub use store::SampleStore;
pub use types::*;
