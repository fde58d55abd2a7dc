//! # Acquisition
//!
//! Bounded acquisition and multi-port mapping engine.
//!
//! Responsibilities:
//! - Capacity-bounded sample buffer with a pluggable capture strategy
//! - Multi-port serial engine: NDJSON records -> fixed-width channel vectors
//! - Dotted field-path resolution against parsed records
//! - Per-port device-clock reconciliation
//!
//! ## Usage Example
//!
//! ```ignore
//! use acquisition::{MultiPortCapture, SampleBuffer};
//! use contracts::FillPolicy;
//!
//! let capture = MultiPortCapture::new(engine_config, Box::new(opener));
//! let mut buffer = SampleBuffer::new(capacity, capture)?;
//! buffer.setup()?;
//! let report = buffer.fill(&FillPolicy::default())?;
//! for sample in buffer.samples() {
//!     // hand off to the downstream stage
//! }
//! ```
//!
//! The buffer and the per-port clock state are owned by the driving thread;
//! accessing them from a second thread requires external synchronization
//! (one mutex around the buffer is enough, mutation is append-then-drain).

mod buffer;
mod capture;
mod clock;
mod engine;
mod mapper;
mod sanitize;
mod stats;

// Re-exports
pub use buffer::SampleBuffer;
pub use capture::{Capture, CaptureOutcome, SyntheticCapture};
pub use clock::ClockAnchor;
pub use contracts::{AcquireOutcome, FillOutcome, FillPolicy, FillReport, Sample};
pub use engine::MultiPortCapture;
pub use mapper::{apply_rules, legacy_channels, resolve_path};
pub use sanitize::extract_record;
pub use stats::{AcquisitionStats, StatsSnapshot};
