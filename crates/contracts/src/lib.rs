//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Samples carry an absolute `DateTime<Utc>` timestamp
//! - Device-relative millisecond counters are converted to absolute time by a
//!   per-port clock anchor, fixed once on the first timestamped record
//! - Batch output renders time as fractional seconds since a caller-supplied
//!   reference instant (typically start of day shifted by a timezone offset)

mod config;
mod error;
mod line_source;
mod mapping;
mod outcome;
mod sample;
mod sink;

pub use config::*;
pub use error::*;
pub use line_source::{LineSource, PortOpener};
pub use mapping::MappingRule;
pub use outcome::*;
pub use sample::{day_start, Sample, SampleBatch};
pub use sink::BatchSink;
