//! Live telemetry buffer

use super::{unix_now, TelemetrySample, TelemetrySummary};
use crate::config::TelemetryConfig;
use crate::diagnostics::{default_sink, RecorderEvent, SharedSink};
use crate::ring::{Iter, RingBuffer};

/// Circular buffer of live telemetry samples
///
/// Holds the last [`TelemetryManager::BUFFER_SIZE`] samples (five minutes at
/// 1 Hz by default). The producer's cadence is not enforced; only the count is
/// bounded. Callers serialize access themselves.
pub struct TelemetryManager {
    buffer: RingBuffer<TelemetrySample>,
    sink: SharedSink,
}

impl TelemetryManager {
    /// Default capacity: 5 minutes at 1 Hz
    pub const BUFFER_SIZE: usize = 300;
    /// Intended sampling interval in seconds
    pub const SAMPLE_INTERVAL: f64 = 1.0;

    /// Create a manager with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(Self::BUFFER_SIZE)
    }

    /// Create a manager holding at most `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: RingBuffer::new(capacity),
            sink: default_sink(),
        }
    }

    /// Create a manager from configuration, reporting to `sink`
    pub fn from_config(config: &TelemetryConfig, sink: SharedSink) -> Self {
        Self {
            buffer: RingBuffer::new(config.buffer_capacity),
            sink,
        }
    }

    /// Replace the event sink
    pub fn set_sink(&mut self, sink: SharedSink) {
        self.sink = sink;
    }

    /// Record a sample, evicting the oldest one when full
    pub fn record_sample(&mut self, sample: TelemetrySample) {
        self.buffer.push(sample);
    }

    /// Samples from the last `seconds` of wall-clock time, oldest first
    ///
    /// The window is measured from now, not from the newest sample, so a
    /// stalled producer yields an empty result.
    pub fn get_recent(&self, seconds: f64) -> Vec<TelemetrySample> {
        self.get_recent_at(seconds, unix_now())
    }

    /// Samples stamped at or after `now - seconds`, oldest first
    pub fn get_recent_at(&self, seconds: f64, now: f64) -> Vec<TelemetrySample> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        self.buffer.since(now - seconds)
    }

    /// All samples, oldest first
    pub fn get_all(&self) -> Vec<TelemetrySample> {
        self.buffer.to_vec()
    }

    /// Iterate the buffer without copying
    pub fn iter(&self) -> Iter<'_, TelemetrySample> {
        self.buffer.iter()
    }

    /// Aggregate statistics over the last `seconds`
    pub fn summary(&self, seconds: f64) -> Option<TelemetrySummary> {
        TelemetrySummary::from_samples(&self.get_recent(seconds))
    }

    /// Aggregate statistics over the window ending at `now`
    pub fn summary_at(&self, seconds: f64, now: f64) -> Option<TelemetrySummary> {
        TelemetrySummary::from_samples(&self.get_recent_at(seconds, now))
    }

    /// Remove all samples
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.sink.emit(&RecorderEvent::BufferCleared { buffer: "Telemetry" });
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of samples held
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Default for TelemetryManager {
    fn default() -> Self {
        Self::new()
    }
}
