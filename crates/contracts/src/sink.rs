//! BatchSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{AcquisitionError, SampleBatch};

/// Batch output trait
///
/// All sink implementations must implement this trait. Writes happen between
/// fill passes on the driver thread, so the interface is synchronous.
pub trait BatchSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one drained batch
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, batch: &SampleBatch) -> Result<(), AcquisitionError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), AcquisitionError>;

    /// Close sink
    fn close(&mut self) -> Result<(), AcquisitionError>;
}
