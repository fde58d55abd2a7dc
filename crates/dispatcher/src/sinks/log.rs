//! LogSink - logs batch summary via tracing

use contracts::{AcquisitionError, BatchSink, SampleBatch};
use tracing::info;

/// Sink that logs batch summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_batch_summary(&self, batch: &SampleBatch) {
        let span = batch
            .samples
            .last()
            .zip(batch.samples.first())
            .map(|(last, first)| last.time_since(first.time))
            .unwrap_or(0.0);

        info!(
            sink = %self.name,
            samples = batch.len(),
            span_s = span,
            reference = %batch.reference,
            "batch received"
        );
    }
}

impl BatchSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, batch: &SampleBatch) -> Result<(), AcquisitionError> {
        self.log_batch_summary(batch);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AcquisitionError> {
        // Nothing to flush for log sink
        Ok(())
    }

    fn close(&mut self) -> Result<(), AcquisitionError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
