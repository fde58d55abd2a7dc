//! Acquisition counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared acquisition counters
#[derive(Debug, Default)]
pub struct AcquisitionStats {
    /// Non-empty lines read across all ports
    pub lines_read: AtomicU64,

    /// Lines discarded (no recoverable record, or not legacy-shaped)
    pub lines_discarded: AtomicU64,

    /// Records that failed to parse
    pub parse_errors: AtomicU64,

    /// Samples appended to the buffer
    pub samples_acquired: AtomicU64,
}

impl AcquisitionStats {
    /// Create new counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-empty line read
    pub fn record_line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a discarded line
    pub fn record_line_discarded(&self) {
        self.lines_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a record parse failure
    pub fn record_parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an acquired sample
    pub fn record_sample(&self) {
        self.samples_acquired.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            lines_discarded: self.lines_discarded.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            samples_acquired: self.samples_acquired.load(Ordering::Relaxed),
        }
    }
}

/// Counter snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSnapshot {
    /// Non-empty lines read across all ports
    pub lines_read: u64,

    /// Lines discarded
    pub lines_discarded: u64,

    /// Record parse failures
    pub parse_errors: u64,

    /// Samples appended to the buffer
    pub samples_acquired: u64,
}
