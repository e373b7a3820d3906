//! Subcommand implementations

use anyhow::{Context, Result};
use std::path::Path;

use decktune_core::blackbox::{write_csv, Recording, RecordingStore, RecordingSummary};
use decktune_core::config::DiagnosticsConfig;
use decktune_core::diagnostics::default_sink;

fn open_store(config: &DiagnosticsConfig) -> RecordingStore {
    RecordingStore::from_config(&config.blackbox, default_sink())
}

fn load(config: &DiagnosticsConfig, handle: &str) -> Result<Recording> {
    open_store(config)
        .load_recording(handle)
        .with_context(|| format!("Cannot open recording '{handle}'"))
}

/// Render listing rows as a fixed-width table
pub fn format_table(recordings: &[RecordingSummary]) -> String {
    let mut out = format!("{:<36} {:<28} {}\n", "HANDLE", "CREATED", "REASON");
    for r in recordings {
        out.push_str(&format!("{:<36} {:<28} {}\n", r.filename, r.timestamp, r.reason));
    }
    out
}

/// Render a recording header and its last `limit` samples
pub fn format_recording(handle: &str, recording: &Recording, limit: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Recording:  {handle}\n"));
    out.push_str(&format!("Created:    {}\n", recording.timestamp));
    out.push_str(&format!("Reason:     {}\n", recording.reason));
    out.push_str(&format!("Duration:   {:.1}s\n", recording.duration_sec));
    out.push_str(&format!("Samples:    {}\n", recording.samples.len()));
    if let Some(peak) = recording.peak_temperature() {
        out.push_str(&format!("Peak temp:  {peak}°C\n"));
    }

    let skip = limit
        .map(|n| recording.samples.len().saturating_sub(n))
        .unwrap_or(0);
    let start = recording.samples.first().map(|s| s.timestamp).unwrap_or(0.0);

    out.push_str(&format!(
        "\n{:>8} {:>6} {:>7} {:>6} {:>4}  {}\n",
        "T+s", "TEMP", "LOAD%", "RPM", "PWM", "UNDERVOLT mV"
    ));
    for s in recording.samples.iter().skip(skip) {
        let offsets: Vec<String> = s.undervolt_values.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!(
            "{:>8.1} {:>6} {:>7.1} {:>6} {:>4}  {}\n",
            s.timestamp - start,
            s.temperature_c,
            s.cpu_load_percent,
            s.fan_speed_rpm,
            s.fan_pwm,
            offsets.join(",")
        ));
    }
    out
}

pub fn list(config: &DiagnosticsConfig, all: bool, json: bool) -> Result<()> {
    let store = open_store(config);
    let recordings = if all {
        store.list_all_recordings()
    } else {
        store.list_recordings()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recordings)?);
    } else if recordings.is_empty() {
        println!("No recordings in {}", store.path().display());
    } else {
        print!("{}", format_table(&recordings));
    }
    Ok(())
}

pub fn show(
    config: &DiagnosticsConfig,
    handle: &str,
    samples: Option<usize>,
    json: bool,
) -> Result<()> {
    let recording = load(config, handle)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recording)?);
    } else {
        print!("{}", format_recording(handle, &recording, samples));
    }
    Ok(())
}

pub fn export(config: &DiagnosticsConfig, handle: &str, output: &Path) -> Result<()> {
    let recording = load(config, handle)?;
    write_csv(output, &recording)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Exported {} samples to {}",
        recording.samples.len(),
        output.display()
    );
    Ok(())
}

pub fn print_config(config: &DiagnosticsConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use decktune_core::blackbox::MetricSample;
    use tempfile::TempDir;

    fn recording() -> Recording {
        Recording {
            timestamp: "2025-01-01T10:00:00.000000".into(),
            reason: "watchdog_timeout".into(),
            duration_sec: 1.0,
            samples: vec![
                MetricSample::new(10.0, 70, 50.0, vec![-20, -25], 3000, 120),
                MetricSample::new(10.5, 75, 60.0, vec![-20, -25], 3100, 125),
                MetricSample::new(11.0, 81, 70.0, vec![-20, -25], 3300, 140),
            ],
        }
    }

    #[test]
    fn test_table_lists_every_entry() {
        let rows = vec![RecordingSummary {
            filename: "blackbox_20250101_100000.json".into(),
            timestamp: "2025-01-01T10:00:00.000000".into(),
            reason: "thermal".into(),
        }];
        let table = format_table(&rows);
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("blackbox_20250101_100000.json"));
        assert!(table.contains("thermal"));
    }

    #[test]
    fn test_recording_sample_limit() {
        let text = format_recording("x.json", &recording(), Some(1));
        assert!(text.contains("Peak temp:  81°C"));
        assert!(text.contains("-20,-25"));
        // header block, blank line, column header, one sample
        assert_eq!(text.lines().count(), 6 + 1 + 1 + 1);
    }

    #[test]
    fn test_export_writes_csv() {
        let dir = TempDir::new().unwrap();
        let mut config = DiagnosticsConfig::default();
        config.blackbox.storage_path = dir.path().to_path_buf();

        let store = open_store(&config);
        let handle = store
            .persist(&recording().samples, "thermal")
            .unwrap()
            .handle()
            .unwrap()
            .to_string();

        let out = dir.path().join("out.csv");
        export(&config, &handle, &out).unwrap();
        let csv = std::fs::read_to_string(&out).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_missing_recording_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = DiagnosticsConfig::default();
        config.blackbox.storage_path = dir.path().to_path_buf();
        assert!(show(&config, "blackbox_20000101_000000.json", None, false).is_err());
    }
}
