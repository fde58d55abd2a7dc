//! Synthetic capture demo
//!
//! Fills a small buffer from the self-test generator and prints the rows the
//! downstream stage would receive. No hardware required.
//!
//! Run: `cargo run --bin synthetic_demo`

use std::time::Duration;

use acquisition::{SampleBuffer, SyntheticCapture};
use anyhow::Result;
use chrono::Utc;
use contracts::{day_start, FillPolicy, SampleBatch};

fn main() -> Result<()> {
    observability::init_with_config(observability::ObservabilityConfig {
        log_format: observability::LogFormat::Pretty,
        metrics_port: None,
        default_log_level: "info".to_string(),
    })?;

    let capture = SyntheticCapture::new(3, 10.0, 2.0)?.with_interval(Duration::from_millis(10));
    let mut buffer = SampleBuffer::new(10, capture)?;
    buffer.setup()?;

    println!("size: {}", buffer.len());
    println!("capa: {}", buffer.capacity());

    buffer.fill(&FillPolicy::default())?;

    let reference = day_start(Utc::now(), 2);
    let batch = SampleBatch::new(reference, buffer.drain());
    for row in batch.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        println!("{}", cells.join(" "));
    }

    Ok(())
}
