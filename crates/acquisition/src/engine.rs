//! Multi-port acquisition engine
//!
//! Turns per-port raw line records into uniform samples, tolerating noise,
//! partial hardware availability, and heterogeneous record shapes. Ports are
//! polled sequentially in index order; the first port yielding a usable
//! record wins the round, which bounds the work done per call without
//! starving any port.

use chrono::Utc;
use contracts::{AcquisitionError, EngineConfig, LineSource, PortOpener, Sample};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::capture::{Capture, CaptureOutcome};
use crate::clock::ClockAnchor;
use crate::mapper::{apply_rules, legacy_channels};
use crate::sanitize::extract_record;
use crate::stats::AcquisitionStats;

/// One configured device slot
struct Port {
    name: String,
    /// `None` means the port failed to open or was torn down
    source: Option<Box<dyn LineSource>>,
    clock: ClockAnchor,
}

/// Capture strategy reading NDJSON records from multiple serial ports
pub struct MultiPortCapture {
    config: EngineConfig,
    opener: Box<dyn PortOpener>,
    ports: Vec<Port>,
    stats: AcquisitionStats,
}

impl MultiPortCapture {
    /// Create an engine; ports open on `setup()`
    pub fn new(config: EngineConfig, opener: Box<dyn PortOpener>) -> Self {
        Self {
            config,
            opener,
            ports: Vec::new(),
            stats: AcquisitionStats::new(),
        }
    }

    /// Number of currently open ports
    pub fn open_port_count(&self) -> usize {
        self.ports
            .iter()
            .filter(|p| p.source.as_ref().is_some_and(|s| s.is_open()))
            .count()
    }

    /// Acquisition counters
    pub fn stats(&self) -> &AcquisitionStats {
        &self.stats
    }

    /// Resolved configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve the sample timestamp for one record on one port.
    ///
    /// Device-relative timing applies only when a timestamp key is
    /// configured, present, and integral; everything else is wall clock.
    fn resolve_time(
        ts_key: Option<&str>,
        clock: &mut ClockAnchor,
        doc: &Value,
    ) -> chrono::DateTime<Utc> {
        let now = Utc::now();
        ts_key
            .and_then(|key| doc.get(key))
            .and_then(Value::as_i64)
            .and_then(|ms| clock.resolve(ms, now))
            .unwrap_or(now)
    }
}

impl Capture for MultiPortCapture {
    /// Open all configured ports.
    ///
    /// A port that fails to open is recorded as closed and warn-logged; the
    /// remaining ports keep working. Idempotent while every port stays open.
    fn setup(&mut self) -> Result<(), AcquisitionError> {
        if !self.ports.is_empty()
            && self
                .ports
                .iter()
                .all(|p| p.source.as_ref().is_some_and(|s| s.is_open()))
        {
            return Ok(());
        }

        let ports: Vec<Port> = self
            .config
            .ports
            .iter()
            .map(|name| {
                let source = match self.opener.open(name, self.config.baud, self.config.timeout())
                {
                    Ok(source) => Some(source),
                    Err(e) => {
                        warn!(port = %name, error = %e, "port failed to open, continuing without it");
                        None
                    }
                };
                Port {
                    name: name.clone(),
                    source,
                    clock: ClockAnchor::new(),
                }
            })
            .collect();
        self.ports = ports;

        info!(
            mode = if self.config.legacy_mode() { "legacy" } else { "mapping" },
            channels = self.config.channels,
            rules = self.config.rules.len(),
            ports = self.ports.len(),
            open = self.open_port_count(),
            "acquisition engine ready"
        );
        Ok(())
    }

    /// One acquisition attempt: at most one record from one port.
    ///
    /// # Errors
    /// `AllPortsClosed` once no port can yield data again; everything else
    /// short of that is a skip, not an error.
    fn poll(&mut self) -> Result<CaptureOutcome, AcquisitionError> {
        let Self {
            config,
            ports,
            stats,
            ..
        } = self;

        if !ports
            .iter()
            .any(|p| p.source.as_ref().is_some_and(|s| s.is_open()))
        {
            return Err(AcquisitionError::AllPortsClosed);
        }

        for (index, port) in ports.iter_mut().enumerate() {
            let Some(source) = port.source.as_mut() else {
                continue;
            };
            if !source.is_open() {
                continue;
            }

            let raw = match source.read_line() {
                Ok(Some(line)) if !line.is_empty() => line,
                Ok(_) => continue,
                Err(e) => {
                    // A connection dying mid-read is an empty round for this
                    // port; the next poll sees it closed and skips it.
                    warn!(port = %port.name, error = %e, "read failed");
                    continue;
                }
            };
            stats.record_line_read();

            let Some(record) = extract_record(&raw) else {
                stats.record_line_discarded();
                observability::record_line_discarded();
                trace!(port = %port.name, "no recoverable record in line");
                continue;
            };

            let doc: Value = match serde_json::from_str(record) {
                Ok(doc) => doc,
                Err(e) => {
                    stats.record_parse_error();
                    observability::record_parse_error();
                    warn!(port = %port.name, error = %e, "cannot parse record");
                    continue;
                }
            };

            let time = Self::resolve_time(config.ts_key.as_deref(), &mut port.clock, &doc);
            let mut sample = Sample::nan(time, config.channels);

            if config.legacy_mode() {
                if !legacy_channels(&doc, &mut sample.data) {
                    stats.record_line_discarded();
                    observability::record_line_discarded();
                    trace!(port = %port.name, "record is not legacy-shaped, discarding");
                    continue;
                }
            } else {
                apply_rules(&doc, index, &config.rules, &mut sample.data);
            }

            stats.record_sample();
            observability::record_sample_acquired();
            return Ok(CaptureOutcome::Sampled(sample));
        }

        Ok(CaptureOutcome::NoData)
    }
}

impl Drop for MultiPortCapture {
    fn drop(&mut self) {
        for port in &mut self.ports {
            if let Some(source) = port.source.as_mut() {
                if source.is_open() {
                    debug!(port = %port.name, "closing port");
                    source.close();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use contracts::MappingRule;
    use transport::{MockLineSource, MockOpener};

    fn engine_config(ports: Vec<&str>, channels: usize, rules: Vec<MappingRule>) -> EngineConfig {
        EngineConfig {
            channels,
            capacity: 16,
            ports: ports.into_iter().map(str::to_string).collect(),
            baud: 115_200,
            timeout_ms: 10,
            ts_key: Some("millis".into()),
            rules,
            tz_offset_hours: 0,
        }
    }

    fn rule(port: usize, path: &str, to: usize) -> MappingRule {
        MappingRule {
            port,
            path: path.into(),
            to,
        }
    }

    fn accel_rules() -> Vec<MappingRule> {
        vec![
            rule(0, "acceleration.x_g", 0),
            rule(0, "acceleration.y_g", 1),
            rule(0, "acceleration.z_g", 2),
            rule(0, "sound_level", 3),
        ]
    }

    fn sampled(engine: &mut MultiPortCapture) -> Sample {
        match engine.poll().unwrap() {
            CaptureOutcome::Sampled(sample) => sample,
            CaptureOutcome::NoData => panic!("expected a sample"),
        }
    }

    #[test]
    fn test_mapping_mode_end_to_end() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines(
                "p0",
                &[
                    r#"{"millis":0,"acceleration":{"x_g":0.1,"y_g":0.2,"z_g":0.3},"sound_level":55}"#,
                    r#"{"millis":10,"acceleration":{"x_g":0.11,"y_g":0.21,"z_g":0.31},"sound_level":56}"#,
                ],
            ),
        );
        let mut engine =
            MultiPortCapture::new(engine_config(vec!["p0"], 4, accel_rules()), Box::new(opener));
        engine.setup().unwrap();

        let first = sampled(&mut engine);
        assert_eq!(first.data, vec![0.1, 0.2, 0.3, 55.0]);

        let second = sampled(&mut engine);
        assert_eq!(second.data, vec![0.11, 0.21, 0.31, 56.0]);
        assert_eq!(second.time - first.time, TimeDelta::milliseconds(10));
    }

    #[test]
    fn test_device_clock_spacing_exact() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines(
                "p0",
                &[r#"{"millis":1000,"v":1}"#, r#"{"millis":1500,"v":2}"#],
            ),
        );
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        let first = sampled(&mut engine);
        let second = sampled(&mut engine);
        assert_eq!(second.time - first.time, TimeDelta::milliseconds(500));
    }

    #[test]
    fn test_missing_ts_key_uses_wall_clock() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &[r#"{"v":1}"#]),
        );
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        let before = Utc::now();
        let sample = sampled(&mut engine);
        let after = Utc::now();
        assert!(sample.time >= before && sample.time <= after);
    }

    #[test]
    fn test_noise_is_sanitized() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &["\x00\x7fgarbage{\"v\":4.5}\r"]),
        );
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        assert_eq!(sampled(&mut engine).data, vec![4.5]);
    }

    #[test]
    fn test_unparsable_record_skipped_without_error() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &["{not json}", r#"{"v":1}"#]),
        );
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        // First poll eats the bad line and moves on within the same round
        // only across ports, so it reports NoData for the single-port case.
        assert!(matches!(engine.poll().unwrap(), CaptureOutcome::NoData));
        assert_eq!(sampled(&mut engine).data, vec![1.0]);
        assert_eq!(engine.stats().snapshot().parse_errors, 1);
    }

    #[test]
    fn test_legacy_mode_fixed_schema() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines(
                "p0",
                &[
                    r#"{"status":"boot"}"#,
                    r#"{"data":{"AI1":1.5,"AI2":2.5,"AI3":3.5}}"#,
                ],
            ),
        );
        let mut engine =
            MultiPortCapture::new(engine_config(vec!["p0"], 3, Vec::new()), Box::new(opener));
        engine.setup().unwrap();

        // Non-legacy record is discarded, not an error
        assert!(matches!(engine.poll().unwrap(), CaptureOutcome::NoData));
        assert_eq!(sampled(&mut engine).data, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_rules_only_apply_to_their_port() {
        let opener = MockOpener::new();
        opener.register("p0", MockLineSource::with_lines("p0", &[r#"{"v":1}"#]));
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 2, vec![rule(1, "v", 0), rule(0, "v", 1)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        let sample = sampled(&mut engine);
        assert!(sample.data[0].is_nan());
        assert_eq!(sample.data[1], 1.0);
    }

    #[test]
    fn test_second_port_wins_when_first_is_silent() {
        let opener = MockOpener::new();
        let mut silent = MockLineSource::new("p0");
        silent.push_silence();
        opener.register("p0", silent);
        opener.register("p1", MockLineSource::with_lines("p1", &[r#"{"v":9}"#]));

        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0", "p1"], 1, vec![rule(1, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        assert_eq!(sampled(&mut engine).data, vec![9.0]);
    }

    #[test]
    fn test_failed_port_does_not_abort_setup() {
        let opener = MockOpener::new();
        opener.register("p1", MockLineSource::with_lines("p1", &[r#"{"v":2}"#]));

        let mut engine = MultiPortCapture::new(
            engine_config(vec!["missing", "p1"], 1, vec![rule(1, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        assert_eq!(engine.open_port_count(), 1);
        assert_eq!(sampled(&mut engine).data, vec![2.0]);
    }

    #[test]
    fn test_independent_clock_anchors_per_port() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &[r#"{"millis":100,"v":1}"#, r#"{"millis":200,"v":1}"#]),
        );
        opener.register(
            "p1",
            MockLineSource::with_lines("p1", &[r#"{"millis":900000,"v":2}"#, r#"{"millis":900050,"v":2}"#]),
        );

        // Alternate ports by exhausting port 0 first in each round pair
        let mut engine = MultiPortCapture::new(
            engine_config(
                vec!["p0", "p1"],
                1,
                vec![rule(0, "v", 0), rule(1, "v", 0)],
            ),
            Box::new(opener),
        );
        engine.setup().unwrap();

        let p0_first = sampled(&mut engine);
        let p0_second = sampled(&mut engine);
        let p1_first = sampled(&mut engine);
        let p1_second = sampled(&mut engine);

        // Each port's spacing follows its own counter, regardless of the
        // wildly different absolute counter values.
        assert_eq!(p0_second.time - p0_first.time, TimeDelta::milliseconds(100));
        assert_eq!(p1_second.time - p1_first.time, TimeDelta::milliseconds(50));
    }

    #[test]
    fn test_non_numeric_leaf_leaves_sentinel() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &[r#"{"v":"fast","w":3.0}"#]),
        );
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 2, vec![rule(0, "v", 0), rule(0, "w", 1)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        let sample = sampled(&mut engine);
        assert!(sample.data[0].is_nan());
        assert_eq!(sample.data[1], 3.0);
    }

    #[test]
    fn test_every_port_closed_is_terminal() {
        let opener = MockOpener::new();
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["missing0", "missing1"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        assert_eq!(engine.open_port_count(), 0);
        assert!(matches!(
            engine.poll(),
            Err(AcquisitionError::AllPortsClosed)
        ));
    }

    #[test]
    fn test_all_ports_silent_reports_no_data() {
        let opener = MockOpener::new();
        opener.register("p0", MockLineSource::new("p0"));
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        assert!(matches!(engine.poll().unwrap(), CaptureOutcome::NoData));
    }

    #[test]
    fn test_float_device_counter_falls_back_to_wall_clock() {
        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &[r#"{"millis":12.5,"v":1}"#]),
        );
        let mut engine = MultiPortCapture::new(
            engine_config(vec!["p0"], 1, vec![rule(0, "v", 0)]),
            Box::new(opener),
        );
        engine.setup().unwrap();

        let before = Utc::now();
        let sample = sampled(&mut engine);
        assert!(sample.time >= before);
    }
}
