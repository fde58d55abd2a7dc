//! AcquisitionConfig / EngineConfig - Config Loader input and output
//!
//! `AcquisitionConfig` is the serde-facing raw form with the historical key
//! set (`ports`/`port`, `map` in two encodings, `map_paths`/`map_to`/
//! `map_ports` parallel lists). `EngineConfig` is the immutable resolved form
//! every component consumes after setup; no component re-reads raw keys.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MappingRule;

/// Raw acquisition configuration as parsed from TOML/JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Buffer capacity in samples
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Device identifiers to open
    #[serde(default)]
    pub ports: Vec<String>,

    /// Single-device form, kept for older configs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Link speed
    #[serde(default = "default_baud")]
    pub baud: u32,

    /// Per-read bound in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout: u64,

    /// Output vector width
    #[serde(default = "default_channels")]
    pub channels: usize,

    /// Device-relative timestamp field name; empty disables device timing
    #[serde(default)]
    pub ts_key: String,

    /// Hours subtracted from UTC midnight for the day-start reference
    #[serde(default = "default_tz_offset")]
    pub tz_offset: i64,

    /// Synthetic generator mean (self-test capture only)
    #[serde(default)]
    pub mean: f64,

    /// Synthetic generator standard deviation (self-test capture only)
    #[serde(default = "default_sd")]
    pub sd: f64,

    /// Parallel-list mapping encoding: field paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_paths: Option<Vec<String>>,

    /// Parallel-list mapping encoding: target channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_to: Option<Vec<i64>>,

    /// Parallel-list mapping encoding: port indices (defaults to port 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_ports: Option<Vec<i64>>,

    /// Mapping rules, inline or as a JSON-encoded string.
    ///
    /// Kept last so the TOML form serializes rule tables after scalar keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapSpec>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ports: Vec::new(),
            port: None,
            baud: default_baud(),
            timeout: default_timeout_ms(),
            channels: default_channels(),
            ts_key: String::new(),
            map: None,
            map_paths: None,
            map_to: None,
            map_ports: None,
            tz_offset: default_tz_offset(),
            mean: 0.0,
            sd: default_sd(),
        }
    }
}

fn default_capacity() -> usize {
    100
}

fn default_baud() -> u32 {
    115_200
}

fn default_timeout_ms() -> u64 {
    100
}

fn default_channels() -> usize {
    3
}

fn default_tz_offset() -> i64 {
    2
}

fn default_sd() -> f64 {
    1.0
}

/// The two accepted `map` encodings
///
/// Inline rule objects, or the same array serialized as a JSON string (the
/// form that survives INI-style config files without nested objects).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapSpec {
    /// Inline rule objects
    Rules(Vec<RawMappingRule>),

    /// JSON-encoded rule array
    Encoded(String),
}

/// One raw, not-yet-validated mapping rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMappingRule {
    /// Port index, negative values discard the entry
    #[serde(default)]
    pub port: i64,

    /// Dot-separated field path
    pub path: String,

    /// Target channel, out-of-range values discard the entry
    #[serde(default)]
    pub to: i64,
}

/// Resolved, immutable engine configuration
///
/// Produced exactly once by the config loader. Mapping mode is frozen here:
/// an empty `rules` list means legacy fixed-schema extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Output vector width
    pub channels: usize,

    /// Buffer capacity in samples
    pub capacity: usize,

    /// Device identifiers, index position doubles as the rule port index
    pub ports: Vec<String>,

    /// Link speed
    pub baud: u32,

    /// Per-read bound in milliseconds
    pub timeout_ms: u64,

    /// Device-relative timestamp field, `None` means wall clock only
    pub ts_key: Option<String>,

    /// Normalized mapping rules, empty means legacy mode
    pub rules: Vec<MappingRule>,

    /// Hours subtracted from UTC midnight for the day-start reference
    pub tz_offset_hours: i64,
}

impl EngineConfig {
    /// Per-read bound as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whether the engine runs in legacy fixed-schema mode
    pub fn legacy_mode(&self) -> bool {
        self.rules.is_empty()
    }
}
