//! # Integration Tests
//!
//! End-to-end tests over the acquisition pipeline without hardware.
//!
//! Covers:
//! - Config resolution -> engine -> buffer -> sink data flow
//! - Fill-to-capacity and attempt-bound semantics
//! - Mapping, legacy fallback, and clock reconstruction properties

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Shared types stay constructible from the outside
        let policy = contracts::FillPolicy::default();
        assert!(policy.reset);
        assert!(policy.max_attempts.is_none());
    }
}

#[cfg(test)]
mod e2e_tests {
    use acquisition::{MultiPortCapture, SampleBuffer};
    use chrono::{TimeDelta, Utc};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{day_start, FillOutcome, FillPolicy, SampleBatch};
    use dispatcher::{BatchSink, FileSink};
    use transport::{MockLineSource, MockOpener, ReplayOpener};

    const MAPPING_CONFIG: &str = r#"{
        "channels": 4,
        "capacity": 2,
        "ports": ["p0"],
        "ts_key": "millis",
        "map": [
            {"port": 0, "path": "acceleration.x_g", "to": 0},
            {"port": 0, "path": "acceleration.y_g", "to": 1},
            {"port": 0, "path": "acceleration.z_g", "to": 2},
            {"port": 0, "path": "sound_level", "to": 3}
        ]
    }"#;

    const LINE_ONE: &str =
        r#"{"millis":0,"acceleration":{"x_g":0.1,"y_g":0.2,"z_g":0.3},"sound_level":55}"#;
    const LINE_TWO: &str =
        r#"{"millis":10,"acceleration":{"x_g":0.11,"y_g":0.21,"z_g":0.31},"sound_level":56}"#;

    /// Full scenario: mapping config over two NDJSON lines produces exactly
    /// two samples with the configured vectors, 10 ms apart.
    #[test]
    fn test_e2e_mapping_pipeline() {
        let raw = ConfigLoader::load_from_str(MAPPING_CONFIG, ConfigFormat::Json).unwrap();
        let engine_config = config_loader::resolve(raw).unwrap();

        let opener = MockOpener::new();
        opener.register("p0", MockLineSource::with_lines("p0", &[LINE_ONE, LINE_TWO]));

        let capture = MultiPortCapture::new(engine_config.clone(), Box::new(opener));
        let mut buffer = SampleBuffer::new(engine_config.capacity, capture).unwrap();
        buffer.setup().unwrap();

        let report = buffer.fill(&FillPolicy::default()).unwrap();
        assert_eq!(report.outcome, FillOutcome::Full);
        assert_eq!(buffer.len(), 2);

        let samples = buffer.drain();
        assert_eq!(samples[0].data, vec![0.1, 0.2, 0.3, 55.0]);
        assert_eq!(samples[1].data, vec![0.11, 0.21, 0.31, 56.0]);
        assert_eq!(
            samples[1].time - samples[0].time,
            TimeDelta::milliseconds(10)
        );
    }

    /// Legacy mode: records without the expected container are discarded and
    /// never consume a capacity slot.
    #[test]
    fn test_e2e_legacy_pipeline() {
        let raw = ConfigLoader::load_from_str(
            r#"{"channels": 3, "capacity": 2, "ports": ["p0"]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let engine_config = config_loader::resolve(raw).unwrap();
        assert!(engine_config.legacy_mode());

        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines(
                "p0",
                &[
                    r#"{"note":"bootloader banner"}"#,
                    r#"{"data":{"AI1":1.0,"AI2":2.0,"AI3":3.0}}"#,
                    r#"{"data":{"AI1":1.1,"AI2":2.1,"AI3":3.1}}"#,
                ],
            ),
        );

        let capture = MultiPortCapture::new(engine_config, Box::new(opener));
        let mut buffer = SampleBuffer::new(2, capture).unwrap();
        buffer.setup().unwrap();

        buffer.fill(&FillPolicy::default()).unwrap();
        let samples = buffer.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].data, vec![1.0, 2.0, 3.0]);
        assert_eq!(samples[1].data, vec![1.1, 2.1, 3.1]);
    }

    /// Buffer never exceeds its capacity, for any capacity.
    #[test]
    fn test_fill_reaches_capacity_exactly() {
        for capacity in [1usize, 3, 7] {
            let opener = MockOpener::new();
            let mut source = MockLineSource::new("p0");
            for i in 0..capacity * 2 {
                source.push_line(format!(r#"{{"millis":{},"v":{}}}"#, i * 10, i));
            }
            opener.register("p0", source);

            let raw = ConfigLoader::load_from_str(
                &format!(
                    r#"{{"channels": 1, "capacity": {capacity}, "ports": ["p0"],
                        "ts_key": "millis", "map": [{{"port":0,"path":"v","to":0}}]}}"#
                ),
                ConfigFormat::Json,
            )
            .unwrap();
            let engine_config = config_loader::resolve(raw).unwrap();

            let capture = MultiPortCapture::new(engine_config, Box::new(opener));
            let mut buffer = SampleBuffer::new(capacity, capture).unwrap();
            buffer.setup().unwrap();

            let report = buffer.fill(&FillPolicy::default()).unwrap();
            assert_eq!(report.outcome, FillOutcome::Full);
            assert_eq!(buffer.len(), capacity);
            assert!(buffer
                .samples()
                .iter()
                .all(|s| s.data.len() == 1));
        }
    }

    /// A silent port ends a bounded pass with AttemptsExhausted instead of
    /// blocking forever.
    #[test]
    fn test_silent_port_respects_attempt_bound() {
        let opener = MockOpener::new();
        opener.register("p0", MockLineSource::new("p0"));

        let raw = ConfigLoader::load_from_str(
            r#"{"channels": 1, "capacity": 4, "ports": ["p0"],
                "map": [{"port":0,"path":"v","to":0}]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let engine_config = config_loader::resolve(raw).unwrap();

        let capture = MultiPortCapture::new(engine_config, Box::new(opener));
        let mut buffer = SampleBuffer::new(4, capture).unwrap();
        buffer.setup().unwrap();

        let report = buffer
            .fill(&FillPolicy {
                reset: true,
                max_attempts: Some(50),
            })
            .unwrap();
        assert_eq!(report.outcome, FillOutcome::AttemptsExhausted);
        assert_eq!(buffer.len(), 0);
    }

    /// An out-of-range `to` never writes any channel.
    #[test]
    fn test_out_of_range_rule_never_writes() {
        let raw = ConfigLoader::load_from_str(
            r#"{"channels": 2, "capacity": 1, "ports": ["p0"],
                "map": [
                    {"port": 0, "path": "v", "to": 0},
                    {"port": 0, "path": "v", "to": 5}
                ]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let engine_config = config_loader::resolve(raw).unwrap();
        assert_eq!(engine_config.rules.len(), 1);

        let opener = MockOpener::new();
        opener.register("p0", MockLineSource::with_lines("p0", &[r#"{"v":8.0}"#]));

        let capture = MultiPortCapture::new(engine_config, Box::new(opener));
        let mut buffer = SampleBuffer::new(1, capture).unwrap();
        buffer.setup().unwrap();
        buffer.fill(&FillPolicy::default()).unwrap();

        let samples = buffer.samples();
        assert_eq!(samples[0].data[0], 8.0);
        assert!(samples[0].data[1].is_nan());
    }

    /// The parallel-list encoding behaves exactly like inline rules.
    #[test]
    fn test_parallel_list_encoding_equivalent() {
        let raw = ConfigLoader::load_from_str(
            r#"{"channels": 2, "capacity": 1, "ports": ["p0"],
                "map_paths": ["a.b", "c"],
                "map_to": [1, 0],
                "map_ports": [0, 0]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let engine_config = config_loader::resolve(raw).unwrap();

        let opener = MockOpener::new();
        opener.register(
            "p0",
            MockLineSource::with_lines("p0", &[r#"{"a":{"b":10},"c":20}"#]),
        );

        let capture = MultiPortCapture::new(engine_config, Box::new(opener));
        let mut buffer = SampleBuffer::new(1, capture).unwrap();
        buffer.setup().unwrap();
        buffer.fill(&FillPolicy::default()).unwrap();

        assert_eq!(buffer.samples()[0].data, vec![20.0, 10.0]);
    }

    /// One dead port leaves the other ports acquiring.
    #[test]
    fn test_partial_port_availability() {
        let opener = MockOpener::new();
        opener.register(
            "good",
            MockLineSource::with_lines("good", &[r#"{"v":1}"#, r#"{"v":2}"#]),
        );

        let raw = ConfigLoader::load_from_str(
            r#"{"channels": 1, "capacity": 2, "ports": ["dead", "good"],
                "map": [{"port":1,"path":"v","to":0}]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let engine_config = config_loader::resolve(raw).unwrap();

        let capture = MultiPortCapture::new(engine_config, Box::new(opener));
        let mut buffer = SampleBuffer::new(2, capture).unwrap();
        buffer.setup().unwrap();
        assert_eq!(buffer.capture().open_port_count(), 1);

        let report = buffer.fill(&FillPolicy::default()).unwrap();
        assert_eq!(report.outcome, FillOutcome::Full);
        assert_eq!(buffer.samples()[1].data, vec![2.0]);
    }

    /// Replay transport: recorded lines flow through the engine into an
    /// NDJSON file sink; exhaustion surfaces as AllPortsClosed with the
    /// acquired samples still buffered.
    #[test]
    fn test_replay_to_file_sink() {
        use std::io::Write;

        let mut capture_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(capture_file, "{}", LINE_ONE).unwrap();
        writeln!(capture_file, "{}", LINE_TWO).unwrap();
        capture_file.flush().unwrap();

        let raw = ConfigLoader::load_from_str(MAPPING_CONFIG, ConfigFormat::Json).unwrap();
        let mut engine_config = config_loader::resolve(raw).unwrap();
        engine_config.capacity = 8;

        let opener = ReplayOpener::new(capture_file.path(), false);
        let capture = MultiPortCapture::new(engine_config, Box::new(opener));
        let mut buffer = SampleBuffer::new(8, capture).unwrap();
        buffer.setup().unwrap();

        // Replay closes itself at EOF; the pass ends with the terminal error
        // while keeping what was acquired.
        let result = buffer.fill(&FillPolicy::default());
        assert!(matches!(
            result,
            Err(contracts::AcquisitionError::AllPortsClosed)
        ));
        assert_eq!(buffer.len(), 2);

        let reference = day_start(Utc::now(), 0);
        let batch = SampleBatch::new(reference, buffer.drain());

        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("rows.ndjson");
        let mut sink = FileSink::create("file", &out_path).unwrap();
        sink.write(&batch).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        // Rows are [t_rel, ch0..ch3]
        let row: Vec<f64> = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(row.len(), 5);
        assert_eq!(&row[1..], &[0.1, 0.2, 0.3, 55.0]);
    }

    /// Batch rows carry relative seconds against the day-start reference.
    #[test]
    fn test_batch_relative_time_rendering() {
        let reference = day_start(Utc::now(), 2);
        let t = reference + TimeDelta::milliseconds(1_250);
        let batch = SampleBatch::new(
            reference,
            vec![contracts::Sample {
                time: t,
                data: vec![7.0],
            }],
        );
        assert_eq!(batch.rows(), vec![vec![1.25, 7.0]]);
    }
}
