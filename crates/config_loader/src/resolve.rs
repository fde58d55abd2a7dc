//! Raw config -> EngineConfig resolution
//!
//! Mapping-rule normalization happens exactly once, here. Both `map`
//! encodings and the parallel-list form produce the same in-memory rule
//! list; nothing downstream ever special-cases the textual form.

use contracts::{
    AcquisitionConfig, AcquisitionError, EngineConfig, MapSpec, MappingRule, RawMappingRule,
};
use tracing::warn;

use crate::validator;

/// Resolve a raw configuration into the immutable engine form.
///
/// Runs validation first, then freezes the mapping mode: if no usable rules
/// survive normalization the engine falls back to legacy extraction.
pub fn resolve(raw: AcquisitionConfig) -> Result<EngineConfig, AcquisitionError> {
    validator::validate(&raw)?;

    // The list is kept verbatim: rule port indices refer to positions here,
    // and an unusable name just becomes a closed port at setup.
    let ports: Vec<String> = if raw.ports.is_empty() {
        raw.port.iter().filter(|p| !p.is_empty()).cloned().collect()
    } else {
        raw.ports.clone()
    };

    let rules = normalize_rules(&raw, raw.channels);

    let ts_key = if raw.ts_key.is_empty() {
        None
    } else {
        Some(raw.ts_key.clone())
    };

    Ok(EngineConfig {
        channels: raw.channels,
        capacity: raw.capacity,
        ports,
        baud: raw.baud,
        timeout_ms: raw.timeout,
        ts_key,
        rules,
        tz_offset_hours: raw.tz_offset,
    })
}

/// Collect raw rules from whichever encoding is present, then keep only the
/// well-formed entries whose target channel is in range.
fn normalize_rules(raw: &AcquisitionConfig, channels: usize) -> Vec<MappingRule> {
    let mut raw_rules: Vec<RawMappingRule> = match &raw.map {
        Some(MapSpec::Rules(rules)) => rules.clone(),
        Some(MapSpec::Encoded(text)) => match serde_json::from_str(text) {
            Ok(rules) => rules,
            Err(e) => {
                warn!(error = %e, "cannot parse encoded map, ignoring it");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    // Parallel-list fallback, only consulted when `map` produced nothing.
    // Lengths were checked by the validator.
    if raw_rules.is_empty() {
        if let (Some(paths), Some(targets)) = (&raw.map_paths, &raw.map_to) {
            let port_indices = raw
                .map_ports
                .clone()
                .unwrap_or_else(|| vec![0; paths.len()]);
            raw_rules = paths
                .iter()
                .zip(targets)
                .zip(port_indices)
                .map(|((path, to), port)| RawMappingRule {
                    port,
                    path: path.clone(),
                    to: *to,
                })
                .collect();
        }
    }

    raw_rules
        .into_iter()
        .filter_map(|rule| sanitize_rule(rule, channels))
        .collect()
}

fn sanitize_rule(rule: RawMappingRule, channels: usize) -> Option<MappingRule> {
    if rule.path.is_empty() {
        return None;
    }
    let port = usize::try_from(rule.port).ok()?;
    let to = usize::try_from(rule.to).ok().filter(|t| *t < channels)?;
    Some(MappingRule {
        port,
        path: rule.path,
        to,
    })
}
