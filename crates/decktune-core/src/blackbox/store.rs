//! Durable recording storage with retention
//!
//! One JSON file per recording. "Oldest" is always decided by the creation
//! timestamp embedded in each file, never by filesystem metadata.

use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

use super::error::{BlackBoxError, PersistOutcome};
use super::recording::{
    is_recording_filename, recording_filename, Recording, RecordingHeader, RecordingSummary,
};
use super::storage::{LocalDisk, StorageBackend};
use super::MetricSample;
use crate::config::BlackBoxConfig;
use crate::diagnostics::{default_sink, RecorderEvent, SharedSink};

/// Directory of persisted recordings with a retention limit
///
/// Assumes a single writer. Two persists within the same second get distinct
/// file names through a numeric suffix.
pub struct RecordingStore<B: StorageBackend = LocalDisk> {
    /// Directory holding the recordings
    root: PathBuf,
    /// Retention limit
    max_recordings: usize,
    backend: B,
    sink: SharedSink,
}

impl RecordingStore<LocalDisk> {
    /// Open a store on the local disk. The directory is created on first persist.
    pub fn new(root: impl Into<PathBuf>, max_recordings: usize) -> Self {
        Self::with_backend(root, max_recordings, LocalDisk, default_sink())
    }

    /// Open a store from configuration
    pub fn from_config(config: &BlackBoxConfig, sink: SharedSink) -> Self {
        Self::with_backend(&config.storage_path, config.max_recordings, LocalDisk, sink)
    }
}

impl<B: StorageBackend> RecordingStore<B> {
    /// Open a store on an arbitrary backend
    pub fn with_backend(
        root: impl Into<PathBuf>,
        max_recordings: usize,
        backend: B,
        sink: SharedSink,
    ) -> Self {
        Self {
            root: root.into(),
            max_recordings: max_recordings.max(1),
            backend,
            sink,
        }
    }

    /// Storage directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Retention limit
    pub fn max_recordings(&self) -> usize {
        self.max_recordings
    }

    /// The storage backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist `samples` as a new recording stamped with the current local time
    ///
    /// If the clock is behind every retained recording, retention removes the
    /// new file right after writing it. The returned handle then no longer
    /// loads and [`RecorderEvent::NewRecordingEvicted`] is reported.
    pub fn persist(
        &self,
        samples: &[MetricSample],
        reason: &str,
    ) -> Result<PersistOutcome, BlackBoxError> {
        self.persist_at(samples, reason, Local::now().naive_local())
    }

    /// Persist `samples` as a recording created at `now`
    ///
    /// An empty snapshot is a no-op. A failed write evicts the oldest
    /// recording and is retried exactly once. Retention runs after the write
    /// and may evict the new recording itself; see [`Self::persist`].
    pub fn persist_at(
        &self,
        samples: &[MetricSample],
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<PersistOutcome, BlackBoxError> {
        if samples.is_empty() {
            self.sink.emit(&RecorderEvent::NothingToPersist);
            return Ok(PersistOutcome::NothingToPersist);
        }

        let recording = Recording::capture(samples, reason, now);

        if let Err(source) = self.backend.create_dir_all(&self.root) {
            self.sink.emit(&RecorderEvent::StorageUnavailable {
                path: self.root.clone(),
                error: source.to_string(),
            });
            return Err(BlackBoxError::StorageDirectory {
                path: self.root.clone(),
                source,
            });
        }

        let contents = serde_json::to_vec_pretty(&recording).map_err(BlackBoxError::Serialize)?;
        let filename = self.unused_filename(now);
        let path = self.root.join(&filename);

        match self.backend.write_atomic(&path, &contents) {
            Ok(()) => {
                self.sink.emit(&RecorderEvent::RecordingSaved { path: path.clone() });
            }
            Err(first) => {
                self.sink.emit(&RecorderEvent::WriteFailed {
                    path: path.clone(),
                    error: first.to_string(),
                });
                if !self.delete_oldest() {
                    return Err(BlackBoxError::WriteFailed {
                        filename,
                        source: first,
                    });
                }
                if let Err(retry) = self.backend.write_atomic(&path, &contents) {
                    self.sink.emit(&RecorderEvent::WriteFailed {
                        path: path.clone(),
                        error: retry.to_string(),
                    });
                    return Err(BlackBoxError::WriteFailed {
                        filename,
                        source: retry,
                    });
                }
                self.sink
                    .emit(&RecorderEvent::RecordingSavedAfterEviction { path: path.clone() });
            }
        }

        if self.cleanup_to_retention_limit().contains(&filename) {
            self.sink.emit(&RecorderEvent::NewRecordingEvicted {
                filename: filename.clone(),
            });
        }
        Ok(PersistOutcome::Saved(filename))
    }

    /// The most recent recordings, newest first, capped at the retention limit
    ///
    /// Unreadable files are skipped. Listing never deletes anything.
    pub fn list_recordings(&self) -> Vec<RecordingSummary> {
        let mut recordings = self.scan();
        let excess = recordings.len().saturating_sub(self.max_recordings);
        let mut recordings = recordings.split_off(excess);
        recordings.reverse();
        recordings
    }

    /// Every readable recording on disk, newest first, ignoring the cap
    pub fn list_all_recordings(&self) -> Vec<RecordingSummary> {
        let mut recordings = self.scan();
        recordings.reverse();
        recordings
    }

    /// Load a recording by handle
    pub fn load_recording(&self, handle: &str) -> Result<Recording, BlackBoxError> {
        let result = self.read_recording(handle);
        if let Err(e) = &result {
            self.sink.emit(&RecorderEvent::LoadFailed {
                filename: handle.to_string(),
                error: e.to_string(),
            });
        }
        result
    }

    fn read_recording(&self, handle: &str) -> Result<Recording, BlackBoxError> {
        if !is_plain_filename(handle) {
            return Err(BlackBoxError::InvalidHandle(handle.to_string()));
        }

        let path = self.root.join(handle);
        if !self.backend.exists(&path) {
            return Err(BlackBoxError::NotFound(handle.to_string()));
        }

        let content = self
            .backend
            .read_to_string(&path)
            .map_err(|source| BlackBoxError::ReadFailed {
                filename: handle.to_string(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| BlackBoxError::Corrupt {
            filename: handle.to_string(),
            source,
        })
    }

    /// Delete the oldest recordings until the retention limit holds
    ///
    /// Best effort: a failed deletion is reported and skipped. Returns the
    /// file names actually removed.
    fn cleanup_to_retention_limit(&self) -> Vec<String> {
        let recordings = self.scan();
        let excess = recordings.len().saturating_sub(self.max_recordings);

        let mut deleted = Vec::new();
        for oldest in recordings.into_iter().take(excess) {
            match self.backend.remove_file(&self.root.join(&oldest.filename)) {
                Ok(()) => {
                    self.sink.emit(&RecorderEvent::RecordingDeleted {
                        filename: oldest.filename.clone(),
                    });
                    deleted.push(oldest.filename);
                }
                Err(e) => self.sink.emit(&RecorderEvent::DeleteFailed {
                    filename: oldest.filename,
                    error: e.to_string(),
                }),
            }
        }
        deleted
    }

    /// Delete the single oldest recording. Returns whether one was removed.
    fn delete_oldest(&self) -> bool {
        let Some(oldest) = self.scan().into_iter().next() else {
            return false;
        };

        match self.backend.remove_file(&self.root.join(&oldest.filename)) {
            Ok(()) => {
                self.sink.emit(&RecorderEvent::RecordingDeleted {
                    filename: oldest.filename,
                });
                true
            }
            Err(e) => {
                self.sink.emit(&RecorderEvent::DeleteFailed {
                    filename: oldest.filename,
                    error: e.to_string(),
                });
                false
            }
        }
    }

    /// Readable recordings sorted oldest first by embedded timestamp
    fn scan(&self) -> Vec<RecordingSummary> {
        if !self.backend.exists(&self.root) {
            return Vec::new();
        }

        let files = match self.backend.list_files(&self.root) {
            Ok(files) => files,
            Err(e) => {
                self.sink.emit(&RecorderEvent::StorageUnreadable {
                    path: self.root.clone(),
                    error: e.to_string(),
                });
                return Vec::new();
            }
        };

        let mut recordings = Vec::new();
        for path in files {
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_recording_filename(filename) {
                continue;
            }

            let header = self
                .backend
                .read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<RecordingHeader>(&content).map_err(|e| e.to_string())
                });

            match header {
                Ok(header) => recordings.push(RecordingSummary {
                    filename: filename.to_string(),
                    timestamp: header.timestamp,
                    reason: header.reason,
                }),
                Err(error) => self.sink.emit(&RecorderEvent::CorruptRecording {
                    path: path.clone(),
                    error,
                }),
            }
        }

        recordings.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        recordings
    }

    /// First file name for `now` not already taken
    fn unused_filename(&self, now: NaiveDateTime) -> String {
        let mut collision = 0;
        loop {
            let filename = recording_filename(now, collision);
            if !self.backend.exists(&self.root.join(&filename)) {
                return filename;
            }
            collision += 1;
        }
    }
}

/// A handle must name a file directly inside the storage directory
fn is_plain_filename(handle: &str) -> bool {
    !handle.is_empty()
        && handle != "."
        && !handle.contains("..")
        && !handle.contains('/')
        && !handle.contains('\\')
}
