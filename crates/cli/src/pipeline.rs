//! Acquisition pipeline driver
//!
//! Owns the fill/drain/dispatch loop on a blocking thread. The async side
//! requests shutdown through a shared flag, checked between passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use acquisition::{MultiPortCapture, SampleBuffer, StatsSnapshot};
use contracts::{
    day_start, AcquisitionError, BatchSink, EngineConfig, FillOutcome, FillPolicy, PortOpener,
    SampleBatch,
};

/// Pipeline limits derived from CLI arguments
#[derive(Debug, Clone, Copy)]
pub struct PipelineLimits {
    /// Stop after this many dispatched batches
    pub max_batches: Option<u64>,

    /// Per-pass bound on acquisition attempts
    pub max_attempts: Option<u64>,
}

/// Final pipeline statistics
#[derive(Debug, Clone, Copy)]
pub struct PipelineSummary {
    /// Batches dispatched to the sink
    pub batches: u64,

    /// Samples across all batches
    pub samples: u64,

    /// Engine counters at shutdown
    pub stats: StatsSnapshot,
}

/// Fill/drain/dispatch loop over one acquisition engine and one sink
pub struct Pipeline {
    buffer: SampleBuffer<MultiPortCapture>,
    sink: Box<dyn BatchSink>,
    limits: PipelineLimits,
    tz_offset_hours: i64,
    stop: Arc<AtomicBool>,
}

impl Pipeline {
    /// Assemble a pipeline from resolved configuration
    pub fn new(
        engine_config: EngineConfig,
        opener: Box<dyn PortOpener>,
        sink: Box<dyn BatchSink>,
        limits: PipelineLimits,
    ) -> Result<Self> {
        let capacity = engine_config.capacity;
        let tz_offset_hours = engine_config.tz_offset_hours;
        let capture = MultiPortCapture::new(engine_config, opener);
        let buffer = SampleBuffer::new(capacity, capture).context("cannot create buffer")?;

        Ok(Self {
            buffer,
            sink,
            limits,
            tz_offset_hours,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shared flag that stops the loop after the current pass
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Run until a limit is reached, every port closes, or stop is requested.
    ///
    /// Blocking; callers on an async runtime should drive this through
    /// `spawn_blocking`.
    pub fn run(mut self) -> Result<PipelineSummary> {
        self.buffer.setup().context("engine setup failed")?;

        if self.buffer.capture().open_port_count() == 0 {
            anyhow::bail!("no ports opened, nothing to acquire");
        }

        let reference = day_start(Utc::now(), self.tz_offset_hours);
        let policy = FillPolicy {
            reset: false,
            max_attempts: self.limits.max_attempts,
        };

        let mut batches = 0u64;
        let mut samples = 0u64;

        loop {
            if self.stop.load(Ordering::SeqCst) {
                info!("stop requested, ending acquisition");
                break;
            }
            if self.limits.max_batches.is_some_and(|max| batches >= max) {
                info!(batches = batches, "batch limit reached");
                break;
            }

            // Ports closing mid-run (replay exhausted, devices unplugged) end
            // the loop after the remaining samples are dispatched.
            let report = match self.buffer.fill(&policy) {
                Ok(report) => Some(report),
                Err(AcquisitionError::AllPortsClosed) => None,
                Err(e) => return Err(e).context("fill pass failed"),
            };

            if let Some(report) = report {
                if report.outcome == FillOutcome::AttemptsExhausted && report.acquired == 0 {
                    warn!(attempts = report.attempts, "pass produced no samples");
                }
            }

            if !self.buffer.is_empty() {
                let batch = SampleBatch::new(reference, self.buffer.drain());
                observability::record_batch_dispatched(batch.len());
                samples += batch.len() as u64;

                self.sink.write(&batch).context("sink write failed")?;
                self.sink.flush().context("sink flush failed")?;
                batches += 1;

                debug!(batch = batches, samples = batch.len(), "batch dispatched");
            }

            if report.is_none() {
                info!("all ports closed, ending acquisition");
                break;
            }
        }

        self.sink.close().context("sink close failed")?;

        Ok(PipelineSummary {
            batches,
            samples,
            stats: self.buffer.capture().stats().snapshot(),
        })
    }
}
