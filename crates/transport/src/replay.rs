//! Replay line source
//!
//! Feeds recorded NDJSON captures back through the acquisition engine, one
//! line per read. Useful for reproducing field issues without the hardware.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use contracts::{AcquisitionError, LineSource, PortOpener};
use tracing::{debug, info};

/// Line source backed by a recorded capture file
pub struct ReplayLineSource {
    name: String,
    lines: Vec<String>,
    cursor: usize,
    loop_replay: bool,
    open: bool,
}

impl ReplayLineSource {
    /// Load a capture file; blank lines are skipped
    pub fn open(path: &Path, loop_replay: bool) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let lines: Vec<String> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();

        info!(
            path = %path.display(),
            lines = lines.len(),
            loop_replay = loop_replay,
            "replay source loaded"
        );

        Ok(Self {
            name: path.display().to_string(),
            lines,
            cursor: 0,
            loop_replay,
            open: true,
        })
    }
}

impl LineSource for ReplayLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if !self.open {
            return Ok(None);
        }

        if self.cursor >= self.lines.len() {
            if self.loop_replay && !self.lines.is_empty() {
                self.cursor = 0;
            } else {
                // Exhausted: close so the engine stops polling this port
                debug!(source = %self.name, "replay exhausted, closing");
                self.open = false;
                return Ok(None);
            }
        }

        let line = self.lines[self.cursor].clone();
        self.cursor += 1;
        Ok(Some(line))
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Opens the same capture file for every configured port
pub struct ReplayOpener {
    path: PathBuf,
    loop_replay: bool,
}

impl ReplayOpener {
    /// Create an opener replaying `path`
    pub fn new(path: impl Into<PathBuf>, loop_replay: bool) -> Self {
        Self {
            path: path.into(),
            loop_replay,
        }
    }
}

impl PortOpener for ReplayOpener {
    fn open(
        &self,
        port: &str,
        _baud: u32,
        _timeout: Duration,
    ) -> Result<Box<dyn LineSource>, AcquisitionError> {
        let source = ReplayLineSource::open(&self.path, self.loop_replay)
            .map_err(|e| AcquisitionError::port_open(port, e.to_string()))?;
        Ok(Box::new(source))
    }
}
