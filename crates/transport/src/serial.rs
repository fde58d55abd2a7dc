//! Serial line source
//!
//! Wraps a `serialport` handle and assembles newline-terminated records from
//! the raw byte stream. One record per `read_line` call; bytes after the
//! newline stay pending for the next call.

use std::io::{self, Read};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use contracts::{AcquisitionError, LineSource, PortOpener};
use tracing::{debug, warn};

/// A line-oriented serial connection
pub struct SerialLineSource {
    name: String,
    handle: Box<dyn serialport::SerialPort>,
    timeout: Duration,
    pending: BytesMut,
    open: bool,
}

impl SerialLineSource {
    /// Wrap an already-open serial handle
    pub fn from_handle(
        name: impl Into<String>,
        handle: Box<dyn serialport::SerialPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            handle,
            timeout,
            pending: BytesMut::with_capacity(512),
            open: true,
        }
    }

    /// Pop one complete line out of the pending buffer, if any
    fn take_pending_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|b| *b == b'\n')?;
        let raw = self.pending.split_to(newline + 1);
        let line = String::from_utf8_lossy(&raw);
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl LineSource for SerialLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if !self.open {
            return Ok(None);
        }

        if let Some(line) = self.take_pending_line() {
            return Ok(Some(line));
        }

        let deadline = Instant::now() + self.timeout;
        let mut chunk = [0u8; 256];

        loop {
            match self.handle.read(&mut chunk) {
                Ok(0) => {}
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    if let Some(line) = self.take_pending_line() {
                        return Ok(Some(line));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    // Device gone: mark closed so the engine skips this port
                    warn!(port = %self.name, error = %e, "serial read failed, closing port");
                    self.open = false;
                    return Err(e);
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        if self.open {
            debug!(port = %self.name, "closing serial port");
            self.open = false;
        }
    }
}

/// Opens real serial connections with the configured link parameters
pub struct SerialPortOpener;

impl PortOpener for SerialPortOpener {
    fn open(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<Box<dyn LineSource>, AcquisitionError> {
        let handle = serialport::new(port, baud)
            .timeout(timeout)
            .open()
            .map_err(|e| AcquisitionError::port_open(port, e.to_string()))?;

        debug!(port = %port, baud = baud, "serial port opened");
        Ok(Box::new(SerialLineSource::from_handle(
            port, handle, timeout,
        )))
    }
}
