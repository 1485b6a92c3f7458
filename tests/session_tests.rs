//! Session lifecycle and sample file behavior

mod common;

use std::fs;

use common::{ellipsoid_samples, temp_path};
use magcal_ellipsoid::{CalibrationError, CalibrationSession, SampleStore, SessionState};
use nalgebra::{Rotation3, Vector3};

fn cloud() -> Vec<Vector3<f64>> {
    ellipsoid_samples(
        Vector3::new(-6.0, 18.0, 9.5),
        Vector3::new(44.0, 51.0, 39.0),
        Rotation3::from_euler_angles(0.5, 0.1, -1.3),
        250,
    )
}

#[test]
fn test_load_three_samples_in_file_order() {
    let path = temp_path("load-three");
    fs::write(&path, "1 2 3\n4 5 6\n7 8 9").unwrap();

    let mut store = SampleStore::new();
    let count = store.load_from_text(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(count, 3);
    assert_eq!(
        store.samples(),
        &[
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        ]
    );
}

#[test]
fn test_malformed_file_leaves_session_untouched() {
    let path = temp_path("malformed");
    fs::write(&path, "1 2 3\n4 5\n7 8 9\n").unwrap();

    let mut session = CalibrationSession::new();
    for s in cloud() {
        session.add(s);
    }
    let fitted = session.recalculate().unwrap();
    let before = session.samples().to_vec();

    let err = session.load_from_text(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, CalibrationError::Format { line: 2, .. }));
    assert_eq!(session.samples(), before.as_slice());
    assert_eq!(session.result(), Some(&fitted));
}

#[test]
fn test_save_then_load_is_identical() {
    let path = temp_path("round-trip");

    let mut session = CalibrationSession::new();
    for s in cloud() {
        session.add(s);
    }
    session.save_to_text(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 250);
    assert!(text.lines().all(|line| line.split('\t').count() == 3));

    let mut restored = CalibrationSession::new();
    assert_eq!(restored.load_from_text(&path).unwrap(), 250);
    fs::remove_file(&path).ok();

    assert_eq!(restored.samples(), session.samples());
    assert_eq!(
        restored.get_or_compute().unwrap(),
        session.get_or_compute().unwrap()
    );
}

#[test]
fn test_save_to_unwritable_path_is_io_error() {
    let session = CalibrationSession::new();
    let err = session
        .save_to_text("/nonexistent/dir/for/sure/samples.txt")
        .unwrap_err();
    assert!(matches!(err, CalibrationError::Io(_)));
}

#[test]
fn test_successful_load_discards_cached_result() {
    let path = temp_path("reload");

    let mut session = CalibrationSession::new();
    for s in cloud() {
        session.add(s);
    }
    session.save_to_text(&path).unwrap();
    session.recalculate().unwrap();
    assert_eq!(session.state(), SessionState::Fitted);

    session.load_from_text(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(session.state(), SessionState::Collecting);
    assert!(session.result().is_none());
}

#[test]
fn test_clear_then_too_few_samples() {
    let mut session = CalibrationSession::new();
    for s in cloud() {
        session.add(s);
    }
    session.get_or_compute().unwrap();

    session.clear();
    assert!(session.samples().is_empty());
    assert!(session.result().is_none());

    for s in cloud().into_iter().take(5) {
        session.add(s);
    }
    assert!(matches!(
        session.get_or_compute(),
        Err(CalibrationError::InsufficientSamples { actual: 5, .. })
    ));
    assert!(session.result().is_none());
}

#[test]
fn test_cached_result_survives_new_samples_until_recalculated() {
    let mut session = CalibrationSession::new();
    let samples = cloud();
    for s in &samples[..200] {
        session.add(*s);
    }
    let first = session.get_or_compute().unwrap();

    // A reading off the surface would move the fit if it were recomputed
    session.add(Vector3::new(64.0, 18.0, 9.5));
    assert_eq!(session.get_or_compute().unwrap(), first);

    let second = session.recalculate().unwrap();
    assert_ne!(second, first);
    assert_eq!(session.result(), Some(&second));
}

#[test]
fn test_config_record_from_lazy_computation() {
    let mut session = CalibrationSession::new();
    for s in cloud() {
        session.record(s);
    }
    assert_eq!(session.state(), SessionState::Collecting);

    let config = session.config_record().unwrap();
    assert_eq!(session.state(), SessionState::Fitted);

    let result = session.result().unwrap();
    assert!((config.center().cast::<f64>() - result.center()).magnitude() < 1e-4);
    assert!((config.matrix().cast::<f64>() - result.compensation()).norm() < 1e-5);
}
