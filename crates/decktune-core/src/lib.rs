//! # DeckTune Core Library
//!
//! Diagnostic telemetry for the DeckTune undervolt and fan tuner.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - A fixed-capacity ring buffer with O(1), allocation-free appends
//! - The black box recorder: 30 s of forensic samples persisted on crash
//! - Retention-bounded, failure-tolerant recording storage
//! - The live telemetry buffer with time-windowed queries
//!
//! Sampling hardware and deciding when to persist are the host's job; this
//! crate only buffers what it is handed and writes it out when asked.
//!
//! ## Example
//!
//! ```rust,no_run
//! use decktune_core::blackbox::{BlackBox, MetricSample, PersistOutcome};
//!
//! let mut blackbox = BlackBox::with_storage_path("/tmp/decktune_blackbox");
//! blackbox.record_sample(MetricSample::new(1_700_000_000.0, 71, 64.0, vec![-25; 4], 3100, 132));
//!
//! if let Ok(PersistOutcome::Saved(handle)) = blackbox.persist_on_crash("watchdog_timeout") {
//!     let recording = blackbox.load_recording(&handle).unwrap();
//!     println!("{} samples saved", recording.samples.len());
//! }
//! ```

pub mod blackbox;
pub mod config;
pub mod diagnostics;
pub mod ring;
pub mod telemetry;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::blackbox::{
        BlackBox, BlackBoxError, MetricSample, PersistOutcome, Recording, RecordingStore,
        RecordingSummary,
    };
    pub use crate::config::{BlackBoxConfig, DiagnosticsConfig, TelemetryConfig};
    pub use crate::diagnostics::{EventSink, RecorderEvent, TracingSink};
    pub use crate::ring::{RingBuffer, Timestamped};
    pub use crate::telemetry::{TelemetryManager, TelemetrySample, TelemetrySummary};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
