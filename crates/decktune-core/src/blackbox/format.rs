//! CSV export of recordings
//!
//! One row per sample, time relative to the first sample, one undervolt
//! column per core.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Recording;

/// Write a recording's samples to a CSV file
pub fn write_csv<P: AsRef<Path>>(path: P, recording: &Recording) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv_to(&mut writer, recording)?;
    writer.flush()
}

/// Write a recording's samples as CSV to any writer
pub fn write_csv_to<W: Write>(writer: &mut W, recording: &Recording) -> io::Result<()> {
    let cores = recording
        .samples
        .iter()
        .map(|s| s.undervolt_values.len())
        .max()
        .unwrap_or(0);

    // Header
    write!(writer, "Time,temperature_c,cpu_load_percent,fan_speed_rpm,fan_pwm")?;
    for core in 0..cores {
        write!(writer, ",undervolt_core{}", core)?;
    }
    writeln!(writer)?;

    let start = recording.samples.first().map(|s| s.timestamp).unwrap_or(0.0);
    for sample in &recording.samples {
        write!(
            writer,
            "{:.3},{},{:.1},{},{}",
            sample.timestamp - start,
            sample.temperature_c,
            sample.cpu_load_percent,
            sample.fan_speed_rpm,
            sample.fan_pwm
        )?;
        for core in 0..cores {
            match sample.undervolt_values.get(core) {
                Some(mv) => write!(writer, ",{}", mv)?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
