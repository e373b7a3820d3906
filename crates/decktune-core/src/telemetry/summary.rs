//! Window statistics for the display layer

use serde::{Deserialize, Serialize};

use super::TelemetrySample;

/// Aggregates over a run of telemetry samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySummary {
    /// Number of samples summarized
    pub sample_count: usize,
    /// Seconds between the first and last sample
    pub span_secs: f64,
    /// Mean temperature in Celsius
    pub avg_temperature_c: f64,
    /// Highest temperature in Celsius
    pub max_temperature_c: f64,
    /// Mean power draw in watts
    pub avg_power_w: f64,
    /// Highest power draw in watts
    pub max_power_w: f64,
    /// Mean CPU load percentage
    pub avg_load_percent: f64,
    /// Highest CPU load percentage
    pub peak_load_percent: f64,
}

impl TelemetrySummary {
    /// Summarize `samples`, or `None` if there are none
    pub fn from_samples(samples: &[TelemetrySample]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;
        let count = samples.len() as f64;

        let mut temp_sum = 0.0;
        let mut power_sum = 0.0;
        let mut load_sum = 0.0;
        let mut max_temp = f64::MIN;
        let mut max_power = f64::MIN;
        let mut peak_load = f64::MIN;

        for s in samples {
            temp_sum += s.temperature_c;
            power_sum += s.power_w;
            load_sum += s.load_percent;
            max_temp = max_temp.max(s.temperature_c);
            max_power = max_power.max(s.power_w);
            peak_load = peak_load.max(s.load_percent);
        }

        Some(Self {
            sample_count: samples.len(),
            span_secs: last.timestamp - first.timestamp,
            avg_temperature_c: temp_sum / count,
            max_temperature_c: max_temp,
            avg_power_w: power_sum / count,
            max_power_w: max_power,
            avg_load_percent: load_sum / count,
            peak_load_percent: peak_load,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_summary() {
        assert!(TelemetrySummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_summary_values() {
        let samples = vec![
            TelemetrySample::new(10.0, 60.0, 10.0, 20.0),
            TelemetrySample::new(11.0, 70.0, 14.0, 80.0),
            TelemetrySample::new(12.0, 80.0, 12.0, 50.0),
        ];
        let summary = TelemetrySummary::from_samples(&samples).unwrap();

        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.span_secs, 2.0);
        assert_eq!(summary.avg_temperature_c, 70.0);
        assert_eq!(summary.max_temperature_c, 80.0);
        assert_eq!(summary.avg_power_w, 12.0);
        assert_eq!(summary.max_power_w, 14.0);
        assert_eq!(summary.avg_load_percent, 50.0);
        assert_eq!(summary.peak_load_percent, 80.0);
    }
}
