//! # Transport
//!
//! Line-oriented connection implementations behind the `LineSource` trait.
//!
//! Responsibilities:
//! - Real serial links (`serialport`, behind the `real-serial` feature)
//! - Scripted mock connections for tests
//! - NDJSON file replay of recorded captures
//!
//! Every source performs bounded-wait reads: a silent device yields
//! `Ok(None)` after the configured timeout instead of blocking the caller.

mod mock;
mod replay;
#[cfg(feature = "real-serial")]
mod serial;

pub use contracts::{LineSource, PortOpener};
pub use mock::{MockLineSource, MockOpener, ScriptItem};
pub use replay::{ReplayLineSource, ReplayOpener};
#[cfg(feature = "real-serial")]
pub use serial::{SerialLineSource, SerialPortOpener};
