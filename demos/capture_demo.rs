//! Complete acquisition pipeline demo
//!
//! Drives the multi-port engine over scripted mock connections: two ports
//! with independent device clocks, a mapping table, noisy and malformed
//! lines, and a log sink receiving the drained batch.
//!
//! Run: `cargo run --bin capture_demo`

use acquisition::{MultiPortCapture, SampleBuffer};
use anyhow::Result;
use chrono::Utc;
use contracts::{day_start, BatchSink, EngineConfig, FillPolicy, MappingRule, SampleBatch};
use dispatcher::LogSink;
use tracing::info;
use transport::{MockLineSource, MockOpener};

fn demo_config() -> EngineConfig {
    let rule = |port: usize, path: &str, to: usize| MappingRule {
        port,
        path: path.to_string(),
        to,
    };

    EngineConfig {
        channels: 4,
        capacity: 6,
        ports: vec!["accel".into(), "mic".into()],
        baud: 1_000_000,
        timeout_ms: 50,
        ts_key: Some("millis".into()),
        rules: vec![
            rule(0, "acceleration.x_g", 0),
            rule(0, "acceleration.y_g", 1),
            rule(0, "acceleration.z_g", 2),
            rule(1, "sound_level", 3),
        ],
        tz_offset_hours: 2,
    }
}

fn scripted_ports(opener: &MockOpener) {
    let mut accel = MockLineSource::new("accel");
    accel.push_line(r#"{"millis":0,"acceleration":{"x_g":0.10,"y_g":0.20,"z_g":0.98}}"#);
    // Stray bridge bytes around the record
    accel.push_line("\x00\x7f{\"millis\":10,\"acceleration\":{\"x_g\":0.11,\"y_g\":0.21,\"z_g\":0.97}}\r");
    accel.push_silence();
    accel.push_line(r#"{"millis":20,"acceleration":{"x_g":0.12,"y_g":0.22,"z_g":0.96}}"#);
    opener.register("accel", accel);

    let mut mic = MockLineSource::new("mic");
    mic.push_line("this line is not a record");
    mic.push_line(r#"{"millis":1000,"sound_level":55}"#);
    mic.push_line(r#"{"millis":1010,"sound_level":57}"#);
    mic.push_line(r#"{"millis":1020,"sound_level":56}"#);
    opener.register("mic", mic);
}

fn main() -> Result<()> {
    observability::init_with_config(observability::ObservabilityConfig {
        log_format: observability::LogFormat::Pretty,
        metrics_port: None,
        default_log_level: "debug".to_string(),
    })?;

    let config = demo_config();
    let opener = MockOpener::new();
    scripted_ports(&opener);

    let capture = MultiPortCapture::new(config.clone(), Box::new(opener));
    let mut buffer = SampleBuffer::new(config.capacity, capture)?;
    buffer.setup()?;

    let report = buffer.fill(&FillPolicy {
        reset: true,
        max_attempts: Some(32),
    })?;
    info!(
        outcome = ?report.outcome,
        attempts = report.attempts,
        acquired = report.acquired,
        "fill pass done"
    );

    let stats = buffer.capture().stats().snapshot();
    info!(
        lines_read = stats.lines_read,
        lines_discarded = stats.lines_discarded,
        parse_errors = stats.parse_errors,
        "engine counters"
    );

    let reference = day_start(Utc::now(), config.tz_offset_hours);
    let batch = SampleBatch::new(reference, buffer.drain());

    let mut sink = LogSink::new("demo");
    sink.write(&batch)?;
    sink.close()?;

    for row in batch.rows() {
        println!("{row:?}");
    }

    Ok(())
}
