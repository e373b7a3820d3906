use chrono::{NaiveDate, NaiveDateTime};
use decktune_core::blackbox::{
    BlackBoxError, LocalDisk, MetricSample, PersistOutcome, Recording, RecordingStore,
};
use decktune_core::diagnostics::{EventSink, NullSink, RecorderEvent};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct Collect(Mutex<Vec<RecorderEvent>>);

impl EventSink for Collect {
    fn emit(&self, event: &RecorderEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 14)
        .unwrap()
        .and_hms_micro_opt(h, m, s, 123_456)
        .unwrap()
}

fn samples() -> Vec<MetricSample> {
    vec![
        MetricSample::new(1_700_000_000.125, 58, 12.5, vec![-20, -22, -18, -25], 2400, 96),
        MetricSample::new(
            1_700_000_000.625,
            61,
            47.333333333333336,
            vec![-20, -22, -18, -25],
            2650,
            110,
        ),
        MetricSample::new(1_700_000_001.125, 67, 99.9, vec![-20, -22, -18, -25], 3400, 170),
    ]
}

fn store(dir: &TempDir) -> RecordingStore {
    RecordingStore::with_backend(dir.path(), 5, LocalDisk, Arc::new(NullSink))
}

#[test]
fn test_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let now = at(14, 30, 5);

    let outcome = store.persist_at(&samples(), "watchdog_timeout", now).unwrap();
    assert_eq!(
        outcome,
        PersistOutcome::Saved("blackbox_20250214_143005.json".to_string())
    );

    let loaded = store.load_recording(outcome.handle().unwrap()).unwrap();
    assert_eq!(loaded, Recording::capture(&samples(), "watchdog_timeout", now));
    assert_eq!(loaded.timestamp, "2025-02-14T14:30:05.123456");
}

#[test]
fn test_non_finite_readings_load_back() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let glitched = vec![
        MetricSample::new(1.0, 60, f64::NAN, vec![-20; 4], 2400, 96),
        MetricSample::new(f64::NAN, 61, 50.0, vec![-20; 4], 2500, 100),
    ];

    let outcome = store.persist_at(&glitched, "sensor_glitch", at(9, 0, 0)).unwrap();
    assert_eq!(store.list_recordings().len(), 1);

    let loaded = store.load_recording(outcome.handle().unwrap()).unwrap();
    assert_eq!(loaded.reason, "sensor_glitch");
    assert_eq!(loaded.len(), 2);
    assert!(loaded.duration_sec.is_nan());
    assert!(loaded.samples[0].cpu_load_percent.is_nan());
    assert!(loaded.samples[1].timestamp.is_nan());
    assert_eq!(loaded.samples[1].cpu_load_percent, 50.0);
}

#[test]
fn test_file_contains_every_field() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let outcome = store.persist_at(&samples(), "thermal", at(1, 2, 3)).unwrap();
    let raw = fs::read_to_string(dir.path().join(outcome.handle().unwrap())).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["reason"], "thermal");
    assert_eq!(json["timestamp"], "2025-02-14T01:02:03.123456");
    assert_eq!(json["duration_sec"], 1.0);
    assert_eq!(json["samples"].as_array().unwrap().len(), 3);
    let first = &json["samples"][0];
    for field in [
        "timestamp",
        "temperature_c",
        "cpu_load_percent",
        "undervolt_values",
        "fan_speed_rpm",
        "fan_pwm",
    ] {
        assert!(first.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn test_single_sample_has_zero_duration() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let outcome = store.persist_at(&samples()[..1], "crash", at(1, 0, 0)).unwrap();
    let loaded = store.load_recording(outcome.handle().unwrap()).unwrap();
    assert_eq!(loaded.duration_sec, 0.0);
}

#[test]
fn test_empty_persist_is_signalled_not_failed() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("never_created");
    let events = Arc::new(Collect::default());
    let store = RecordingStore::with_backend(&root, 5, LocalDisk, events.clone());

    assert_eq!(store.persist(&[], "crash").unwrap(), PersistOutcome::NothingToPersist);
    assert!(!root.exists());
    assert_eq!(
        *events.0.lock().unwrap(),
        vec![RecorderEvent::NothingToPersist]
    );
}

#[test]
fn test_corrupt_files_skipped_in_listing() {
    let dir = TempDir::new().unwrap();
    let events = Arc::new(Collect::default());
    let store = RecordingStore::with_backend(dir.path(), 5, LocalDisk, events.clone());

    for s in 0..3 {
        store.persist_at(&samples(), "ok", at(2, 0, s)).unwrap();
    }
    fs::write(dir.path().join("blackbox_20250214_010000.json"), "{ \"timestamp\": ").unwrap();
    fs::write(dir.path().join("README.txt"), "not a recording").unwrap();

    let listed = store.list_recordings();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|r| r.reason == "ok"));
    assert_eq!(listed[0].filename, "blackbox_20250214_020002.json");

    let corrupt = events
        .0
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, RecorderEvent::CorruptRecording { .. }))
        .count();
    assert_eq!(corrupt, 1);
}

#[test]
fn test_listing_missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("absent");
    let store = RecordingStore::with_backend(root, 5, LocalDisk, Arc::new(NullSink));
    assert!(store.list_recordings().is_empty());
}

#[test]
fn test_listing_defaults_missing_metadata() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blackbox_20250214_000000.json"), "{}").unwrap();

    let listed = store(&dir).list_recordings();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].timestamp, "");
    assert_eq!(listed[0].reason, "unknown");
}

#[test]
fn test_load_failures() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    assert!(matches!(
        store.load_recording("blackbox_20250214_000000.json"),
        Err(BlackBoxError::NotFound(_))
    ));

    fs::write(dir.path().join("bad.json"), "[1, 2").unwrap();
    assert!(matches!(
        store.load_recording("bad.json"),
        Err(BlackBoxError::Corrupt { .. })
    ));

    fs::write(
        dir.path().join("partial.json"),
        r#"{"timestamp": "2025-02-14T00:00:00", "samples": []}"#,
    )
    .unwrap();
    let err = store.load_recording("partial.json").unwrap_err();
    assert!(matches!(err, BlackBoxError::Corrupt { .. }));
    assert!(err.is_load_failure());
}

#[test]
fn test_unwritable_directory_is_storage_failure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let store =
        RecordingStore::with_backend(blocker.join("bb"), 5, LocalDisk, Arc::new(NullSink));
    let err = store.persist_at(&samples(), "crash", at(3, 0, 0)).unwrap_err();

    assert!(matches!(err, BlackBoxError::StorageDirectory { .. }));
    assert!(err.is_storage_failure());
}
