//! Configuration validation
//!
//! Rules:
//! - capacity > 0
//! - channels > 0
//! - baud > 0, timeout > 0
//! - at least one port configured (`ports` or `port`)
//! - no duplicate port identifiers
//! - map_paths/map_to/map_ports lengths agree (never silently truncated)

use std::collections::HashSet;

use contracts::{AcquisitionConfig, AcquisitionError};

/// Validate an AcquisitionConfig
///
/// Returns the first violation encountered, or Ok(()).
pub fn validate(config: &AcquisitionConfig) -> Result<(), AcquisitionError> {
    validate_capacity(config)?;
    validate_channels(config)?;
    validate_link_params(config)?;
    validate_ports(config)?;
    validate_parallel_map_lists(config)?;
    Ok(())
}

fn validate_capacity(config: &AcquisitionConfig) -> Result<(), AcquisitionError> {
    if config.capacity == 0 {
        return Err(AcquisitionError::config_validation(
            "capacity",
            "capacity must be > 0",
        ));
    }
    Ok(())
}

fn validate_channels(config: &AcquisitionConfig) -> Result<(), AcquisitionError> {
    if config.channels == 0 {
        return Err(AcquisitionError::config_validation(
            "channels",
            "channels must be > 0",
        ));
    }
    Ok(())
}

fn validate_link_params(config: &AcquisitionConfig) -> Result<(), AcquisitionError> {
    if config.baud == 0 {
        return Err(AcquisitionError::config_validation(
            "baud",
            "baud must be > 0",
        ));
    }
    if config.timeout == 0 {
        return Err(AcquisitionError::config_validation(
            "timeout",
            "timeout must be > 0 milliseconds",
        ));
    }
    Ok(())
}

/// At least one resolvable port, no duplicates
fn validate_ports(config: &AcquisitionConfig) -> Result<(), AcquisitionError> {
    let mut names: Vec<&str> = config.ports.iter().map(String::as_str).collect();
    if names.is_empty() {
        if let Some(single) = config.port.as_deref() {
            names.push(single);
        }
    }

    if names.iter().all(|n| n.is_empty()) {
        return Err(AcquisitionError::config_validation(
            "ports",
            "no ports configured",
        ));
    }

    let mut seen = HashSet::new();
    for name in names {
        if !name.is_empty() && !seen.insert(name) {
            return Err(AcquisitionError::config_validation(
                format!("ports[{name}]"),
                "duplicate port identifier",
            ));
        }
    }
    Ok(())
}

/// The three parallel lists must agree in length when present
fn validate_parallel_map_lists(config: &AcquisitionConfig) -> Result<(), AcquisitionError> {
    let (Some(paths), Some(to)) = (&config.map_paths, &config.map_to) else {
        // One list without the other is malformed as well
        if config.map_paths.is_some() != config.map_to.is_some() {
            return Err(AcquisitionError::config_validation(
                "map_paths/map_to",
                "map_paths and map_to must be provided together",
            ));
        }
        return Ok(());
    };

    if paths.len() != to.len() {
        return Err(AcquisitionError::config_validation(
            "map_paths/map_to",
            format!(
                "length mismatch: {} paths vs {} targets",
                paths.len(),
                to.len()
            ),
        ));
    }

    if let Some(ports) = &config.map_ports {
        if ports.len() != paths.len() {
            return Err(AcquisitionError::config_validation(
                "map_ports",
                format!(
                    "length mismatch: {} ports vs {} paths",
                    ports.len(),
                    paths.len()
                ),
            ));
        }
    }
    Ok(())
}
