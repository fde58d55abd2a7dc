//! LineSource trait - line-oriented connection abstraction
//!
//! Decouples the acquisition engine from concrete transports so real serial
//! links, scripted mocks, and file replay are handled uniformly.

use std::io;
use std::time::Duration;

use crate::AcquisitionError;

/// One line-oriented device connection.
///
/// A source is exclusively owned by its port entry; no two components read
/// the same connection concurrently.
pub trait LineSource: Send {
    /// Device identifier, used for logging
    fn name(&self) -> &str;

    /// Bounded-wait read of one newline-terminated record.
    ///
    /// Returns `Ok(None)` when no complete line arrived within the configured
    /// timeout; that is a normal round, not an error. A closed connection
    /// surfaces as an error or as `is_open() == false`, never as a hang.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Whether the connection is currently usable
    fn is_open(&self) -> bool;

    /// Close the connection; subsequent reads are skipped by the engine
    fn close(&mut self);
}

/// Factory for opening configured ports.
///
/// The engine calls this once per configured device at setup; an `Err` marks
/// the port closed without aborting the engine.
pub trait PortOpener: Send {
    /// Open a connection with the configured link parameters
    fn open(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn LineSource>, AcquisitionError>;
}
