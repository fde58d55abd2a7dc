//! Mock line source
//!
//! Scripted connections for tests without hardware. Each `read_line` call
//! consumes one script item; `Silence` models a timed-out round.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use contracts::{AcquisitionError, LineSource, PortOpener};

/// One scripted read result
#[derive(Debug, Clone)]
pub enum ScriptItem {
    /// A complete line arrives
    Line(String),

    /// The read times out without data
    Silence,
}

/// Scripted line source
#[derive(Debug, Default)]
pub struct MockLineSource {
    name: String,
    script: VecDeque<ScriptItem>,
    open: bool,
}

impl MockLineSource {
    /// Create an empty source; an exhausted script reads as silence
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: VecDeque::new(),
            open: true,
        }
    }

    /// Create a source that yields the given lines in order
    pub fn with_lines<S: AsRef<str>>(name: impl Into<String>, lines: &[S]) -> Self {
        let mut source = Self::new(name);
        for line in lines {
            source.push_line(line.as_ref());
        }
        source
    }

    /// Append one line to the script
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.script.push_back(ScriptItem::Line(line.into()));
    }

    /// Append one timed-out round to the script
    pub fn push_silence(&mut self) {
        self.script.push_back(ScriptItem::Silence);
    }

    /// Remaining script length
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LineSource for MockLineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if !self.open {
            return Ok(None);
        }
        match self.script.pop_front() {
            Some(ScriptItem::Line(line)) => Ok(Some(line)),
            Some(ScriptItem::Silence) | None => Ok(None),
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Hands out pre-registered mock sources by port name.
///
/// Ports with no registered source fail to open, which is how tests exercise
/// partial hardware availability.
#[derive(Default)]
pub struct MockOpener {
    sources: Mutex<HashMap<String, MockLineSource>>,
}

impl MockOpener {
    /// Create an opener with no registered ports
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source handed out for `port`
    pub fn register(&self, port: impl Into<String>, source: MockLineSource) {
        if let Ok(mut sources) = self.sources.lock() {
            sources.insert(port.into(), source);
        }
    }
}

impl PortOpener for MockOpener {
    fn open(
        &self,
        port: &str,
        _baud: u32,
        _timeout: Duration,
    ) -> Result<Box<dyn LineSource>, AcquisitionError> {
        let source = self
            .sources
            .lock()
            .map_err(|_| AcquisitionError::port_open(port, "mock opener poisoned"))?
            .remove(port)
            .ok_or_else(|| AcquisitionError::port_open(port, "no such mock port"))?;
        Ok(Box::new(source))
    }
}
