//! MappingRule - normalized field-to-channel association
//!
//! Rules are built once at configuration resolution; the engine never
//! re-reads the raw `map` forms.

use serde::{Deserialize, Serialize};

/// One normalized mapping rule: (port, field path) -> channel index.
///
/// `port` is the zero-based index into the configured port list, `path` is a
/// dot-separated key sequence resolved against each parsed record, and `to`
/// is guaranteed to lie inside `[0, channels)` after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Zero-based index into the configured port list
    pub port: usize,

    /// Dot-separated field path, e.g. `"acceleration.x_g"`
    pub path: String,

    /// Target channel index
    pub to: usize,
}
