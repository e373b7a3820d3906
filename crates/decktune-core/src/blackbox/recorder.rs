//! Forensic recorder
//!
//! Ring buffer of [`MetricSample`]s plus the store that persists it when the
//! host reports a crash, watchdog timeout or thermal event.

use chrono::NaiveDateTime;
use std::path::PathBuf;

use super::error::{BlackBoxError, PersistOutcome};
use super::recording::{Recording, RecordingSummary};
use super::storage::{LocalDisk, StorageBackend};
use super::store::RecordingStore;
use super::MetricSample;
use crate::config::{BlackBoxConfig, DEFAULT_STORAGE_PATH};
use crate::diagnostics::{default_sink, RecorderEvent, SharedSink};
use crate::ring::{Iter, RingBuffer};

/// Black box recorder
///
/// Keeps a rolling window of the last 30 seconds of metrics (60 samples at
/// 500 ms) and writes it to disk on demand. Appending never allocates once the
/// buffer is full and never fails.
pub struct BlackBox<B: StorageBackend = LocalDisk> {
    buffer: RingBuffer<MetricSample>,
    store: RecordingStore<B>,
    sink: SharedSink,
}

impl BlackBox<LocalDisk> {
    /// Seconds of history kept at the intended cadence
    pub const BUFFER_DURATION_SEC: u64 = 30;
    /// Intended sampling interval
    pub const SAMPLE_INTERVAL_MS: u64 = 500;
    /// Samples kept in memory
    pub const BUFFER_SIZE: usize = 60;
    /// Recordings kept on disk
    pub const MAX_RECORDINGS: usize = 5;
    /// Default storage directory
    pub const STORAGE_PATH: &'static str = DEFAULT_STORAGE_PATH;

    /// Recorder with default capacity and storage under [`Self::STORAGE_PATH`]
    pub fn new() -> Self {
        Self::from_config(&BlackBoxConfig::default(), default_sink())
    }

    /// Recorder with default capacity storing recordings under `path`
    pub fn with_storage_path(path: impl Into<PathBuf>) -> Self {
        Self::from_config(
            &BlackBoxConfig::default().with_storage_path(path),
            default_sink(),
        )
    }

    /// Recorder built from configuration
    pub fn from_config(config: &BlackBoxConfig, sink: SharedSink) -> Self {
        Self::with_backend(config, LocalDisk, sink)
    }
}

impl Default for BlackBox<LocalDisk> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: StorageBackend> BlackBox<B> {
    /// Recorder persisting through an arbitrary storage backend
    pub fn with_backend(config: &BlackBoxConfig, backend: B, sink: SharedSink) -> Self {
        Self {
            buffer: RingBuffer::new(config.buffer_capacity),
            store: RecordingStore::with_backend(
                &config.storage_path,
                config.max_recordings,
                backend,
                sink.clone(),
            ),
            sink,
        }
    }

    /// Add a sample, evicting the oldest one when full
    pub fn record_sample(&mut self, sample: MetricSample) {
        self.buffer.push(sample);
    }

    /// Copy of the buffered samples, oldest first
    pub fn get_samples(&self) -> Vec<MetricSample> {
        self.buffer.to_vec()
    }

    /// Iterate the buffered samples, oldest first
    pub fn iter(&self) -> Iter<'_, MetricSample> {
        self.buffer.iter()
    }

    /// The underlying ring buffer
    pub fn buffer(&self) -> &RingBuffer<MetricSample> {
        &self.buffer
    }

    /// Number of samples currently buffered
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Drop all buffered samples
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.sink.emit(&RecorderEvent::BufferCleared { buffer: "BlackBox" });
    }

    /// Snapshot the buffer and write it to disk
    ///
    /// Returns the recording's handle, [`PersistOutcome::NothingToPersist`]
    /// for an empty buffer, or a storage error. The buffer is left intact.
    pub fn persist_on_crash(&self, reason: &str) -> Result<PersistOutcome, BlackBoxError> {
        self.store.persist(&self.buffer.to_vec(), reason)
    }

    /// [`Self::persist_on_crash`] with an explicit creation time
    pub fn persist_on_crash_at(
        &self,
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<PersistOutcome, BlackBoxError> {
        self.store.persist_at(&self.buffer.to_vec(), reason, now)
    }

    /// Recent recordings, newest first
    pub fn list_recordings(&self) -> Vec<RecordingSummary> {
        self.store.list_recordings()
    }

    /// Load a recording by handle
    pub fn load_recording(&self, handle: &str) -> Result<Recording, BlackBoxError> {
        self.store.load_recording(handle)
    }

    /// The recording store
    pub fn store(&self) -> &RecordingStore<B> {
        &self.store
    }
}
