//! `run` command implementation.

use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use tracing::{info, warn};

use contracts::{EngineConfig, PortOpener};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineLimits};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load, validate and resolve configuration
    let raw = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let engine_config =
        config_loader::resolve(raw).context("Failed to resolve engine configuration")?;

    info!(
        channels = engine_config.channels,
        capacity = engine_config.capacity,
        ports = engine_config.ports.len(),
        rules = engine_config.rules.len(),
        mode = if engine_config.legacy_mode() { "legacy" } else { "mapping" },
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&engine_config);
        return Ok(());
    }

    // Metrics endpoint (if enabled)
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)
            .context("Failed to start metrics endpoint")?;
    }

    let opener = build_opener(args)?;
    let sink = dispatcher::sink_for_output(args.output.as_deref())
        .context("Failed to create output sink")?;

    let limits = PipelineLimits {
        max_batches: if args.max_batches == 0 {
            None
        } else {
            Some(args.max_batches)
        },
        max_attempts: if args.max_attempts == 0 {
            None
        } else {
            Some(args.max_attempts)
        },
    };

    let pipeline = Pipeline::new(engine_config, opener, sink, limits)?;
    let stop = pipeline.stop_flag();

    info!("Starting pipeline...");
    let mut handle = tokio::task::spawn_blocking(move || pipeline.run());

    let summary = tokio::select! {
        result = &mut handle => result.context("Pipeline task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            warn!("Received shutdown signal, stopping after current pass...");
            stop.store(true, Ordering::SeqCst);
            handle.await.context("Pipeline task panicked")??
        }
    };

    info!(
        batches = summary.batches,
        samples = summary.samples,
        lines_read = summary.stats.lines_read,
        lines_discarded = summary.stats.lines_discarded,
        parse_errors = summary.stats.parse_errors,
        "Pipeline finished"
    );

    Ok(())
}

/// Pick the transport: replay file when requested, serial otherwise
fn build_opener(args: &RunArgs) -> Result<Box<dyn PortOpener>> {
    if let Some(path) = &args.replay {
        info!(replay = %path.display(), "Using replay transport");
        return Ok(Box::new(transport::ReplayOpener::new(
            path,
            args.replay_loop,
        )));
    }

    #[cfg(feature = "real-serial")]
    {
        Ok(Box::new(transport::SerialPortOpener))
    }

    #[cfg(not(feature = "real-serial"))]
    {
        anyhow::bail!(
            "built without serial support; use --replay or rebuild with the real-serial feature"
        )
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &EngineConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Capacity: {}", config.capacity);
    println!("Channels: {}", config.channels);
    println!("Baud: {}", config.baud);
    println!("Timeout: {} ms", config.timeout_ms);
    println!(
        "TS key: {}",
        config.ts_key.as_deref().unwrap_or("(wall clock)")
    );
    println!("TZ offset: {} h", config.tz_offset_hours);

    println!("\nPorts ({}):", config.ports.len());
    for (index, port) in config.ports.iter().enumerate() {
        println!("  [{index}] {port}");
    }

    if config.legacy_mode() {
        println!("\nMode: legacy (data.AI1..AI3)");
    } else {
        println!("\nMode: mapping ({} rules)", config.rules.len());
        for rule in &config.rules {
            println!("  port {} : {} -> channel {}", rule.port, rule.path, rule.to);
        }
    }

    println!();
}
