//! Sample - Acquisition output
//!
//! One timestamped, fixed-width channel vector. Channels that no mapping rule
//! or legacy field populated hold `f64::NAN`, never absence: every sample in a
//! buffer has exactly the configured channel count.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One acquired sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute acquisition timestamp
    pub time: DateTime<Utc>,

    /// Channel values, `data.len()` equals the configured channel count
    pub data: Vec<f64>,
}

impl Sample {
    /// Create a sample with all channels set to the NaN sentinel
    pub fn nan(time: DateTime<Utc>, channels: usize) -> Self {
        Self {
            time,
            data: vec![f64::NAN; channels],
        }
    }

    /// Seconds elapsed since `t0`, as a fraction
    pub fn time_since(&self, t0: DateTime<Utc>) -> f64 {
        let elapsed = self.time.signed_duration_since(t0);
        elapsed
            .num_nanoseconds()
            .map(|ns| ns as f64 / 1e9)
            .unwrap_or_else(|| elapsed.num_milliseconds() as f64 / 1e3)
    }

    /// Render as an output row: `[t_rel_seconds, ch0, ch1, ...]`
    pub fn to_row(&self, t0: DateTime<Utc>) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.data.len() + 1);
        row.push(self.time_since(t0));
        row.extend_from_slice(&self.data);
        row
    }
}

/// One drained buffer pass, rendered relative to a reference instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleBatch {
    /// Reference instant for relative-time rendering
    pub reference: DateTime<Utc>,

    /// Samples in acquisition order
    pub samples: Vec<Sample>,
}

impl SampleBatch {
    /// Create a batch from drained samples
    pub fn new(reference: DateTime<Utc>, samples: Vec<Sample>) -> Self {
        Self { reference, samples }
    }

    /// Number of samples in the batch
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Render all samples as `[t_rel, ch0, ..]` rows
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.samples
            .iter()
            .map(|s| s.to_row(self.reference))
            .collect()
    }

    /// Render as a JSON array of rows
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.rows())
    }
}

/// Start of the current day shifted back by a timezone offset.
///
/// This is the reference instant the downstream stage expects: sample times
/// render as seconds since local midnight.
pub fn day_start(now: DateTime<Utc>, tz_offset_hours: i64) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    midnight - TimeDelta::hours(tz_offset_hours)
}
