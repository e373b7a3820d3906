//! Persisted recordings

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{f64_or_nan, MetricSample};

/// File name prefix shared by every recording
pub const RECORDING_PREFIX: &str = "blackbox_";
/// File extension of recordings
pub const RECORDING_EXTENSION: &str = "json";

/// ISO-8601 creation time, microsecond precision, sorts lexically
const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
/// Compact date-time used in file names
const FILENAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A persisted snapshot of the forensic buffer
///
/// Owns a copy of the samples; later changes to the live buffer never reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// ISO-8601 time the recording was created
    pub timestamp: String,
    /// Why the recording was made, e.g. "watchdog_timeout"
    pub reason: String,
    /// Seconds between the first and last sample
    #[serde(deserialize_with = "f64_or_nan")]
    pub duration_sec: f64,
    /// Samples, oldest first
    #[serde(default)]
    pub samples: Vec<MetricSample>,
}

impl Recording {
    /// Build a recording from a buffer snapshot
    pub fn capture(
        samples: &[MetricSample],
        reason: impl Into<String>,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp: created.format(CREATED_FORMAT).to_string(),
            reason: reason.into(),
            duration_sec: Self::duration_of(samples),
            samples: samples.to_vec(),
        }
    }

    /// Span from first to last sample, or 0 with fewer than two samples
    pub fn duration_of(samples: &[MetricSample]) -> f64 {
        match (samples.first(), samples.last()) {
            (Some(first), Some(last)) if samples.len() >= 2 => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Highest temperature seen in the recording
    pub fn peak_temperature(&self) -> Option<i32> {
        self.samples.iter().map(|s| s.temperature_c).max()
    }
}

/// Listing entry for a recording on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSummary {
    /// Handle used to load the recording
    pub filename: String,
    /// Embedded creation time
    pub timestamp: String,
    /// Embedded reason
    pub reason: String,
}

/// The part of a recording file that listing needs
#[derive(Debug, Deserialize)]
pub(crate) struct RecordingHeader {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default = "unknown_reason")]
    pub reason: String,
}

fn unknown_reason() -> String {
    "unknown".to_string()
}

/// File name for a recording created at `created`
///
/// `collision` 0 gives the plain name; higher values add a numeric suffix
/// used when a recording already exists for that second.
pub fn recording_filename(created: NaiveDateTime, collision: u32) -> String {
    let stamp = created.format(FILENAME_FORMAT);
    if collision == 0 {
        format!("{RECORDING_PREFIX}{stamp}.{RECORDING_EXTENSION}")
    } else {
        format!("{RECORDING_PREFIX}{stamp}_{collision}.{RECORDING_EXTENSION}")
    }
}

/// Check if a file name looks like a recording
pub fn is_recording_filename(name: &str) -> bool {
    name.len() > RECORDING_PREFIX.len() + RECORDING_EXTENSION.len() + 1
        && name.starts_with(RECORDING_PREFIX)
        && name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext == RECORDING_EXTENSION)
}
