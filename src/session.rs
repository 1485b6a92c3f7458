//! Calibration session: sample collection plus a cached calibration result

use std::path::Path;

use log::{debug, info, warn};

use crate::calibration::compensate_all;
use crate::error::Result;
use crate::fit::fit_ellipsoid_with;
use crate::solve::solve_calibration;
use crate::store::SampleStore;
use crate::types::{CalibrationResult, MagCalConfig, Sample, SessionSettings, SessionState};

/// Magnetometer calibration session
///
/// Owns the collected samples and at most one solved [`CalibrationResult`].
/// Results are computed lazily through [`get_or_compute`](Self::get_or_compute)
/// or on demand through [`recalculate`](Self::recalculate). A failed
/// computation never touches the cached result.
///
/// The session has no interior locking; hosts sharing it between threads
/// must serialize access themselves.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magcal_ellipsoid::{CalibrationError, CalibrationSession};
///
/// let mut session = CalibrationSession::new();
/// session.add(Vector3::new(21.0, -4.0, 37.5));
///
/// // A general quadric needs at least nine samples
/// assert!(matches!(
///     session.get_or_compute(),
///     Err(CalibrationError::InsufficientSamples { .. })
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalibrationSession {
    /// Session settings
    settings: SessionSettings,
    /// Collected raw samples
    store: SampleStore,
    /// Most recent successful calibration
    result: Option<CalibrationResult>,
    /// Set when samples or the result change, cleared by `take_dirty`
    dirty: bool,
}

impl CalibrationSession {
    /// Create an empty session with default settings
    pub fn new() -> Self {
        Self::with_settings(SessionSettings::default())
    }

    /// Create an empty session with the given settings
    pub fn with_settings(settings: SessionSettings) -> Self {
        Self {
            settings,
            store: SampleStore::new(),
            result: None,
            dirty: false,
        }
    }

    /// Current settings
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Replace the settings; collected samples and the cached result are kept
    pub fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    /// Append a raw sample
    ///
    /// The cached result is kept unless
    /// [`SessionSettings::invalidate_on_add`] is set.
    pub fn add(&mut self, sample: Sample) {
        self.store.add(sample);
        if self.settings.invalidate_on_add {
            self.result = None;
        }
        self.dirty = true;
    }

    /// Telemetry entry point: append `sample` only while collecting is enabled
    ///
    /// Returns whether the sample was stored.
    pub fn record(&mut self, sample: Sample) -> bool {
        if !self.settings.collecting {
            return false;
        }
        self.add(sample);
        true
    }

    /// Enable or disable storing of samples passed to [`record`](Self::record)
    pub fn set_collecting(&mut self, collecting: bool) {
        self.settings.collecting = collecting;
    }

    /// Whether [`record`](Self::record) currently stores samples
    pub fn is_collecting(&self) -> bool {
        self.settings.collecting
    }

    /// Drop every sample and the cached result
    pub fn clear(&mut self) {
        info!("clearing calibration session ({} samples)", self.store.len());
        self.store.clear();
        self.result = None;
        self.dirty = true;
    }

    /// Replace the samples with the contents of a text file
    ///
    /// On success the cached result is discarded, since it belongs to the
    /// previous data set. On failure nothing changes.
    pub fn load_from_text<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        match self.store.load_from_text(path.as_ref()) {
            Ok(count) => {
                self.result = None;
                self.dirty = true;
                Ok(count)
            }
            Err(err) => {
                warn!("rejected sample file {}: {}", path.as_ref().display(), err);
                Err(err)
            }
        }
    }

    /// Write the samples to a text file
    pub fn save_to_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.store.save_to_text(path.as_ref()).inspect_err(|err| {
            warn!("could not save samples to {}: {}", path.as_ref().display(), err);
        })
    }

    /// Fit and solve from the current samples, replacing the cached result
    ///
    /// On failure the error from the fit or solve stage is returned and any
    /// previously cached result is left as it was.
    pub fn recalculate(&mut self) -> Result<CalibrationResult> {
        let computed = fit_ellipsoid_with(self.store.samples(), &self.settings.fit)
            .and_then(|quadric| solve_calibration(&quadric));

        match computed {
            Ok(result) => {
                info!(
                    "calibrated from {} samples, field strength {:.3}",
                    self.store.len(),
                    result.field_strength()
                );
                self.result = Some(result);
                self.dirty = true;
                Ok(result)
            }
            Err(err) => {
                warn!("calibration with {} samples failed: {}", self.store.len(), err);
                Err(err)
            }
        }
    }

    /// Return the cached result, computing it first if there is none
    pub fn get_or_compute(&mut self) -> Result<CalibrationResult> {
        match self.result {
            Some(result) => {
                debug!("using cached calibration");
                Ok(result)
            }
            None => self.recalculate(),
        }
    }

    /// The cached result, if any
    pub fn result(&self) -> Option<&CalibrationResult> {
        self.result.as_ref()
    }

    /// Calibration fields for the vehicle configuration record
    ///
    /// Uses the cached result or computes one.
    pub fn config_record(&mut self) -> Result<MagCalConfig> {
        self.get_or_compute().map(|result| result.to_config())
    }

    /// Collected samples
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Collected samples in insertion order
    pub fn samples(&self) -> &[Sample] {
        self.store.samples()
    }

    /// Every collected sample passed through the cached result
    ///
    /// `None` while no result is cached.
    pub fn compensated_samples(&self) -> Option<Vec<Sample>> {
        self.result
            .as_ref()
            .map(|result| compensate_all(self.store.samples(), result))
    }

    /// Lifecycle state
    pub fn state(&self) -> SessionState {
        match (&self.result, self.store.is_empty()) {
            (Some(_), _) => SessionState::Fitted,
            (None, false) => SessionState::Collecting,
            (None, true) => SessionState::Empty,
        }
    }

    /// Whether samples or the result changed since the last [`take_dirty`](Self::take_dirty)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and reset the change flag
    ///
    /// Renderers poll this on their own schedule; the session never triggers
    /// redraws itself.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }
}
