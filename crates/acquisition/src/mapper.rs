//! Field mapper
//!
//! Resolves dotted field paths against parsed records and fills channel
//! vectors, either through configured mapping rules or the legacy fixed
//! schema. Absence is a normal outcome here, never an error: configuration
//! is free-form and records vary per firmware.

use contracts::MappingRule;
use serde_json::Value;

/// Container object expected by legacy-mode records
pub const LEGACY_CONTAINER_KEY: &str = "data";

/// Legacy field names, mapped to channels 0..3 in order
pub const LEGACY_CHANNEL_KEYS: [&str; 3] = ["AI1", "AI2", "AI3"];

/// Resolve a dot-separated path to a numeric leaf.
///
/// Integer, unsigned and floating leaves all coerce to `f64`. Any missing
/// segment or non-numeric leaf yields `None`.
pub fn resolve_path(doc: &Value, path: &str) -> Option<f64> {
    let mut current = doc;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    current.as_f64()
}

/// Apply every rule matching `port_index` to the channel vector.
///
/// A rule whose path does not resolve skips silently, leaving the sentinel in
/// place; later rules overwrite earlier ones targeting the same channel.
pub fn apply_rules(doc: &Value, port_index: usize, rules: &[MappingRule], data: &mut [f64]) {
    for rule in rules.iter().filter(|r| r.port == port_index) {
        if let Some(value) = resolve_path(doc, &rule.path) {
            if let Some(slot) = data.get_mut(rule.to) {
                *slot = value;
            }
        }
    }
}

/// Fill channels from the legacy fixed schema.
///
/// Returns `false` when the record lacks the expected container object, in
/// which case the record is not legacy-shaped and must be discarded. Channel
/// counts below 3 copy only the available prefix.
pub fn legacy_channels(doc: &Value, data: &mut [f64]) -> bool {
    let Some(container) = doc.get(LEGACY_CONTAINER_KEY).and_then(Value::as_object) else {
        return false;
    };

    for (channel, key) in LEGACY_CHANNEL_KEYS.iter().enumerate().take(data.len()) {
        if let Some(value) = container.get(*key).and_then(Value::as_f64) {
            data[channel] = value;
        }
    }
    true
}
