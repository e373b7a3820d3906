//! Recorder event reporting
//!
//! Components never log through global state directly. They report
//! [`RecorderEvent`]s to an injected [`EventSink`]; the default sink forwards
//! them to `tracing`.

use std::path::PathBuf;
use std::sync::Arc;

/// Something worth reporting that happened inside a recorder
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    /// Persist was requested with an empty buffer
    NothingToPersist,
    /// A recording was written
    RecordingSaved {
        /// Full path of the new file
        path: PathBuf,
    },
    /// A recording was written after evicting the oldest one
    RecordingSavedAfterEviction {
        /// Full path of the new file
        path: PathBuf,
    },
    /// Writing a recording failed
    WriteFailed {
        /// Target path of the write
        path: PathBuf,
        /// Underlying I/O error
        error: String,
    },
    /// The storage directory could not be created
    StorageUnavailable {
        /// Storage directory
        path: PathBuf,
        /// Underlying I/O error
        error: String,
    },
    /// The storage directory exists but could not be listed
    StorageUnreadable {
        /// Storage directory
        path: PathBuf,
        /// Underlying I/O error
        error: String,
    },
    /// A recording was removed by retention cleanup or to free space
    RecordingDeleted {
        /// Handle of the removed recording
        filename: String,
    },
    /// Retention removed the recording that was just written, because its
    /// creation time was older than every retained one
    NewRecordingEvicted {
        /// Handle returned by the persist
        filename: String,
    },
    /// Removing a recording failed
    DeleteFailed {
        /// Handle of the recording
        filename: String,
        /// Underlying I/O error
        error: String,
    },
    /// A recording file could not be read or parsed and was skipped
    CorruptRecording {
        /// Path of the skipped file
        path: PathBuf,
        /// Read or parse error
        error: String,
    },
    /// A recording requested by handle could not be loaded
    LoadFailed {
        /// Requested handle
        filename: String,
        /// Why loading failed
        error: String,
    },
    /// A sample buffer was emptied
    BufferCleared {
        /// Which buffer, e.g. "BlackBox" or "Telemetry"
        buffer: &'static str,
    },
}

/// Receiver for recorder events
pub trait EventSink: Send + Sync {
    /// Report an event
    fn emit(&self, event: &RecorderEvent);
}

/// Shared handle to an event sink
pub type SharedSink = Arc<dyn EventSink>;

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &RecorderEvent) {
        match event {
            RecorderEvent::NothingToPersist => {
                tracing::warn!("BlackBox: no samples to persist");
            }
            RecorderEvent::RecordingSaved { path } => {
                tracing::info!("BlackBox: saved recording to {}", path.display());
            }
            RecorderEvent::RecordingSavedAfterEviction { path } => {
                tracing::info!(
                    "BlackBox: saved recording after cleanup to {}",
                    path.display()
                );
            }
            RecorderEvent::WriteFailed { path, error } => {
                tracing::error!(
                    "BlackBox: failed to save recording {}: {error}",
                    path.display()
                );
            }
            RecorderEvent::StorageUnavailable { path, error } => {
                tracing::error!(
                    "BlackBox: failed to create storage directory {}: {error}",
                    path.display()
                );
            }
            RecorderEvent::StorageUnreadable { path, error } => {
                tracing::error!(
                    "BlackBox: failed to list storage directory {}: {error}",
                    path.display()
                );
            }
            RecorderEvent::NewRecordingEvicted { filename } => {
                tracing::warn!("BlackBox: new recording {filename} was removed by retention");
            }
            RecorderEvent::RecordingDeleted { filename } => {
                tracing::debug!("BlackBox: deleted recording {filename}");
            }
            RecorderEvent::DeleteFailed { filename, error } => {
                tracing::warn!("BlackBox: failed to delete recording {filename}: {error}");
            }
            RecorderEvent::CorruptRecording { path, error } => {
                tracing::warn!(
                    "BlackBox: skipping unreadable recording {}: {error}",
                    path.display()
                );
            }
            RecorderEvent::LoadFailed { filename, error } => {
                tracing::error!("BlackBox: failed to load recording {filename}: {error}");
            }
            RecorderEvent::BufferCleared { buffer } => {
                tracing::debug!("{buffer} buffer cleared");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &RecorderEvent) {}
}

/// The sink used when none is supplied
pub fn default_sink() -> SharedSink {
    Arc::new(TracingSink)
}
