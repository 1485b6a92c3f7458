//! Ordered storage of raw magnetometer samples and the plain-text sample format
//!
//! The text format is one sample per line, three numbers per line. Loading
//! accepts any run of whitespace between the numbers; saving writes them
//! tab-separated. There is no header and no version marker.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{CalibrationError, Result};
use crate::types::Sample;

/// Ordered collection of raw samples
///
/// Insertion order is kept for display purposes; the ellipsoid fit does not
/// depend on it. Growth is unbounded and duplicates are kept.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magcal_ellipsoid::SampleStore;
///
/// let mut store = SampleStore::new();
/// store.add(Vector3::new(12.0, -3.5, 40.1));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStore {
    samples: Vec<Sample>,
}

impl SampleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `samples` in the given order
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Append a sample
    pub fn add(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Remove every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in insertion order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterate over samples in insertion order
    pub fn iter(&self) -> core::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Replace the contents with the samples read from `reader`
    ///
    /// Every line is parsed before anything is committed. On the first
    /// malformed line the call fails with [`CalibrationError::Format`] and the
    /// store keeps exactly what it held before.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let parsed = parse_samples(reader)?;
        let count = parsed.len();
        self.samples = parsed;
        Ok(count)
    }

    /// Write every sample as a tab-separated `x\ty\tz` line, in store order
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        for s in &self.samples {
            writeln!(writer, "{}\t{}\t{}", s.x, s.y, s.z)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Replace the contents with the samples stored in the text file at `path`
    ///
    /// All-or-nothing, see [`read_from`](Self::read_from). Returns the number
    /// of samples loaded.
    pub fn load_from_text<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let count = self.read_from(BufReader::new(file))?;
        info!("loaded {} samples from {}", count, path.display());
        Ok(count)
    }

    /// Write the samples to the text file at `path`, replacing it
    pub fn save_to_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        info!("saved {} samples to {}", self.samples.len(), path.display());
        Ok(())
    }
}

impl Extend<Sample> for SampleStore {
    fn extend<T: IntoIterator<Item = Sample>>(&mut self, iter: T) {
        self.samples.extend(iter);
    }
}

impl FromIterator<Sample> for SampleStore {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SampleStore {
    type Item = &'a Sample;
    type IntoIter = core::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Parse a whole sample file, stopping at the first malformed line
fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| match err.kind() {
            ErrorKind::InvalidData => CalibrationError::Format {
                line: index + 1,
                reason: "line is not valid UTF-8".to_string(),
            },
            _ => err.into(),
        })?;
        samples.push(parse_line(&line, index + 1)?);
    }

    debug!("parsed {} samples", samples.len());
    Ok(samples)
}

fn parse_line(line: &str, line_number: usize) -> Result<Sample> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(CalibrationError::Format {
            line: line_number,
            reason: format!("expected 3 values, found {}", tokens.len()),
        });
    }

    let mut values = [0.0f64; 3];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token.parse().map_err(|_| CalibrationError::Format {
            line: line_number,
            reason: format!("`{}` is not a number", token),
        })?;
    }

    Ok(Sample::new(values[0], values[1], values[2]))
}
