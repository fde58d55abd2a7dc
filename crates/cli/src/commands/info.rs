//! `info` command implementation.
//!
//! Renders the resolved configuration the way the acquisition host displays
//! source information: a short key/value summary, optionally with the full
//! normalized rule table.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Reading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let engine = config_loader::ConfigLoader::load_engine_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let mut output = json!({
            "capacity": engine.capacity,
            "channels": engine.channels,
            "ports": engine.ports,
            "baud": engine.baud,
            "timeout_ms": engine.timeout_ms,
            "ts_key": engine.ts_key,
            "tz_offset": engine.tz_offset_hours,
            "mode": if engine.legacy_mode() { "legacy" } else { "mapping" },
        });
        if args.rules {
            output["rules"] = serde_json::to_value(&engine.rules)
                .context("Failed to serialize mapping rules")?;
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize info")?
        );
        return Ok(());
    }

    println!("Capacity:  {}", engine.capacity);
    println!("Channels:  {}", engine.channels);
    println!("Ports:     {:?}", engine.ports);
    println!("Baud:      {}", engine.baud);
    println!("Timeout:   {} ms", engine.timeout_ms);
    println!(
        "TS key:    {}",
        engine.ts_key.as_deref().unwrap_or("(wall clock)")
    );
    println!("TZ offset: {} h", engine.tz_offset_hours);
    println!(
        "Mode:      {}",
        if engine.legacy_mode() {
            "legacy (data.AI1..AI3)".to_string()
        } else {
            format!("mapping ({} rules)", engine.rules.len())
        }
    );

    if args.rules && !engine.rules.is_empty() {
        println!("\nRules:");
        for rule in &engine.rules {
            println!("  port {} : {} -> channel {}", rule.port, rule.path, rule.to);
        }
    }

    Ok(())
}
