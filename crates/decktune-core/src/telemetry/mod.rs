//! Live Telemetry
//!
//! Rolling five-minute history of temperature, power and load for the
//! display layer, with time-windowed queries.

mod manager;
mod summary;

pub use manager::TelemetryManager;
pub use summary::TelemetrySummary;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ring::Timestamped;

/// A single live telemetry sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Unix timestamp in seconds
    pub timestamp: f64,
    /// CPU temperature in Celsius
    pub temperature_c: f64,
    /// Power draw in Watts
    pub power_w: f64,
    /// CPU load percentage (0-100)
    pub load_percent: f64,
}

impl TelemetrySample {
    /// Create a new sample
    pub fn new(timestamp: f64, temperature_c: f64, power_w: f64, load_percent: f64) -> Self {
        Self {
            timestamp,
            temperature_c,
            power_w,
            load_percent,
        }
    }
}

impl Timestamped for TelemetrySample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Current wall-clock time in seconds since the Unix epoch
pub fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
