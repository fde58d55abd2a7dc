//! # Dispatcher
//!
//! Routes drained sample batches to output sinks.
//!
//! Responsibilities:
//! - `LogSink`: batch summaries via tracing
//! - `FileSink`: NDJSON rows on disk, one `[t_rel, ch0, ..]` array per line

mod sinks;

pub use contracts::BatchSink;
pub use sinks::{FileSink, LogSink};

use std::path::Path;

use contracts::AcquisitionError;

/// Pick the sink for an optional output path.
///
/// A path yields a `FileSink`; no path falls back to logging summaries.
pub fn sink_for_output(output: Option<&Path>) -> Result<Box<dyn BatchSink>, AcquisitionError> {
    match output {
        Some(path) => Ok(Box::new(FileSink::create("file", path)?)),
        None => Ok(Box::new(LogSink::new("log"))),
    }
}
