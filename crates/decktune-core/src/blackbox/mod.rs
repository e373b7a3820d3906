//! Black Box Recorder
//!
//! Keeps the last thirty seconds of system health samples in memory and,
//! when instability is detected, persists them to disk for post-mortem
//! analysis. Retention keeps at most a handful of recordings on disk.

mod error;
mod format;
mod recorder;
mod recording;
mod storage;
mod store;

pub use error::{BlackBoxError, PersistOutcome};
pub use format::{write_csv, write_csv_to};
pub use recorder::BlackBox;
pub use recording::{
    is_recording_filename, recording_filename, Recording, RecordingSummary, RECORDING_EXTENSION,
    RECORDING_PREFIX,
};
pub use storage::{LocalDisk, StorageBackend};
pub use store::RecordingStore;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ring::Timestamped;

/// A single forensic sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Unix timestamp in seconds
    #[serde(deserialize_with = "f64_or_nan")]
    pub timestamp: f64,
    /// CPU temperature in Celsius
    pub temperature_c: i32,
    /// CPU load percentage (0-100)
    #[serde(deserialize_with = "f64_or_nan")]
    pub cpu_load_percent: f64,
    /// Per-core undervolt offsets in mV (usually negative)
    pub undervolt_values: Vec<i32>,
    /// Fan speed in RPM
    pub fan_speed_rpm: u32,
    /// Fan PWM duty (0-255)
    pub fan_pwm: u8,
}

impl MetricSample {
    /// Create a new sample
    pub fn new(
        timestamp: f64,
        temperature_c: i32,
        cpu_load_percent: f64,
        undervolt_values: Vec<i32>,
        fan_speed_rpm: u32,
        fan_pwm: u8,
    ) -> Self {
        Self {
            timestamp,
            temperature_c,
            cpu_load_percent,
            undervolt_values,
            fan_speed_rpm,
            fan_pwm,
        }
    }
}

/// JSON has no NaN or infinity and `serde_json` writes them as `null`.
/// Read `null` back as NaN so a glitched reading still loads.
pub(crate) fn f64_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Timestamped for MetricSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
