//! Acquisition metrics recording
//!
//! Thin wrappers over the `metrics` macros so hot-path call sites stay
//! one-liners and metric names live in one place.

use metrics::{counter, gauge};

/// Record one sample appended to the buffer
pub fn record_sample_acquired() {
    counter!("serial_acq_samples_total").increment(1);
}

/// Record one discarded line (noise, or not legacy-shaped)
pub fn record_line_discarded() {
    counter!("serial_acq_lines_discarded_total").increment(1);
}

/// Record one record parse failure
pub fn record_parse_error() {
    counter!("serial_acq_parse_errors_total").increment(1);
}

/// Record the current buffer depth
pub fn record_buffer_depth(depth: usize) {
    gauge!("serial_acq_buffer_depth").set(depth as f64);
}

/// Record one dispatched batch and its sample count
pub fn record_batch_dispatched(samples: usize) {
    counter!("serial_acq_batches_total").increment(1);
    counter!("serial_acq_batch_samples_total").increment(samples as u64);
}
