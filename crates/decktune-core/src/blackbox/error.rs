//! Black box errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by black box persistence and loading
#[derive(Error, Debug)]
pub enum BlackBoxError {
    /// The storage directory could not be created
    #[error("Failed to create storage directory {}: {source}", .path.display())]
    StorageDirectory {
        /// Storage directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing the recording failed, after the eviction retry if one was possible
    #[error("Failed to write recording {filename}: {source}")]
    WriteFailed {
        /// File name that was being written
        filename: String,
        /// I/O error of the last attempt
        #[source]
        source: io::Error,
    },

    /// The recording could not be encoded as JSON
    #[error("Failed to serialize recording: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No recording exists for the handle
    #[error("Recording not found: {0}")]
    NotFound(String),

    /// The recording file exists but could not be read
    #[error("Failed to read recording {filename}: {source}")]
    ReadFailed {
        /// Requested handle
        filename: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The recording file is not a valid recording
    #[error("Corrupt recording {filename}: {source}")]
    Corrupt {
        /// Requested handle
        filename: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// The handle does not name a file inside the storage directory
    #[error("Invalid recording handle: '{0}'")]
    InvalidHandle(String),
}

impl BlackBoxError {
    /// True for failures to store a recording
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            BlackBoxError::StorageDirectory { .. }
                | BlackBoxError::WriteFailed { .. }
                | BlackBoxError::Serialize(_)
        )
    }

    /// True for failures to load a recording
    pub fn is_load_failure(&self) -> bool {
        !self.is_storage_failure()
    }
}

/// Result of a persist request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Recording written; carries its handle (file name)
    Saved(String),
    /// The buffer was empty, nothing was written
    NothingToPersist,
}

impl PersistOutcome {
    /// Handle of the saved recording
    pub fn handle(&self) -> Option<&str> {
        match self {
            PersistOutcome::Saved(handle) => Some(handle),
            PersistOutcome::NothingToPersist => None,
        }
    }
}
