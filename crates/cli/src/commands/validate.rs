//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::EngineConfig;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    mode: String,
    channels: usize,
    capacity: usize,
    port_count: usize,
    rule_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load, validate and resolve
    let resolved = config_loader::ConfigLoader::load_from_path(&args.config)
        .and_then(config_loader::resolve);

    match resolved {
        Ok(engine) => {
            let warnings = collect_warnings(&engine);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    mode: if engine.legacy_mode() {
                        "legacy".to_string()
                    } else {
                        "mapping".to_string()
                    },
                    channels: engine.channels,
                    capacity: engine.capacity,
                    port_count: engine.ports.len(),
                    rule_count: engine.rules.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(engine: &EngineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if engine.legacy_mode() {
        warnings.push(
            "No usable mapping rules - falling back to legacy data.AI1..AI3 extraction"
                .to_string(),
        );
    }

    if engine.ts_key.is_none() {
        warnings.push("No ts_key configured - samples use wall-clock time".to_string());
    }

    // Channels no rule writes stay at the NaN sentinel forever
    if !engine.legacy_mode() {
        let unmapped: Vec<usize> = (0..engine.channels)
            .filter(|ch| engine.rules.iter().all(|r| r.to != *ch))
            .collect();
        if !unmapped.is_empty() {
            warnings.push(format!("Channels {unmapped:?} have no mapping rule"));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Mode: {}", summary.mode);
            println!("  Channels: {}", summary.channels);
            println!("  Capacity: {}", summary.capacity);
            println!("  Ports: {}", summary.port_count);
            println!("  Rules: {}", summary.rule_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
