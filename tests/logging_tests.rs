//! Warnings emitted by failing session file operations

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use magcal_ellipsoid::CalibrationSession;

struct Capture {
    warnings: Mutex<Vec<String>>,
}

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut warnings) = self.warnings.lock() {
                warnings.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    warnings: Mutex::new(Vec::new()),
};

#[test]
fn test_failed_load_and_save_are_both_warned() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Warn);

    let missing = "/nonexistent/dir/for/sure/samples.txt";
    let mut session = CalibrationSession::new();
    assert!(session.load_from_text(missing).is_err());
    assert!(session.save_to_text(missing).is_err());

    let warnings = CAPTURE.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[0].contains(missing));
    assert!(warnings[1].contains("could not save samples"));
    assert!(warnings[1].contains(missing));
}
