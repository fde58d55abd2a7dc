//! Bounded sample buffer
//!
//! Holds an ordered, capacity-bounded sequence of timestamped samples and
//! owns the fill-until-full driving loop. Capacity is fixed at construction;
//! capacity-exceeded is an outcome, not an error.

use contracts::{
    AcquireOutcome, AcquisitionError, FillOutcome, FillPolicy, FillReport, Sample,
};

use crate::capture::{Capture, CaptureOutcome};

/// Capacity-bounded buffer over a pluggable capture strategy
pub struct SampleBuffer<C: Capture> {
    capacity: usize,
    samples: Vec<Sample>,
    capture: C,
}

impl<C: Capture> SampleBuffer<C> {
    /// Create a buffer with a fixed positive capacity.
    ///
    /// # Errors
    /// Zero capacity is a configuration error.
    pub fn new(capacity: usize, capture: C) -> Result<Self, AcquisitionError> {
        if capacity == 0 {
            return Err(AcquisitionError::config_validation(
                "capacity",
                "capacity must be > 0",
            ));
        }
        Ok(Self {
            capacity,
            samples: Vec::with_capacity(capacity),
            capture,
        })
    }

    /// Prepare the capture strategy (open ports, prime generators)
    pub fn setup(&mut self) -> Result<(), AcquisitionError> {
        self.capture.setup()
    }

    /// One acquisition attempt.
    ///
    /// Returns `Full` without touching the strategy when the buffer already
    /// holds `capacity` samples; otherwise reports whether the strategy
    /// produced a sample this round.
    pub fn acquire(&mut self) -> Result<AcquireOutcome, AcquisitionError> {
        if self.is_full() {
            return Ok(AcquireOutcome::Full);
        }
        match self.capture.poll()? {
            CaptureOutcome::Sampled(sample) => {
                self.samples.push(sample);
                observability::record_buffer_depth(self.samples.len());
                Ok(AcquireOutcome::Sampled)
            }
            CaptureOutcome::NoData => Ok(AcquireOutcome::NoData),
        }
    }

    /// Drive `acquire()` until the buffer is full or the attempt bound
    /// elapses.
    ///
    /// Without `max_attempts` this terminates only when the strategy fills
    /// the remaining capacity; over silent ports that can take arbitrarily
    /// long, so callers without an eventual-data guarantee should bound it.
    pub fn fill(&mut self, policy: &FillPolicy) -> Result<FillReport, AcquisitionError> {
        if policy.reset {
            self.reset();
        }

        let mut attempts = 0u64;
        let mut acquired = 0usize;
        loop {
            if let Some(max) = policy.max_attempts {
                if attempts >= max {
                    return Ok(FillReport {
                        outcome: FillOutcome::AttemptsExhausted,
                        attempts,
                        acquired,
                    });
                }
            }
            attempts += 1;
            match self.acquire()? {
                AcquireOutcome::Sampled => acquired += 1,
                AcquireOutcome::NoData => {}
                AcquireOutcome::Full => {
                    return Ok(FillReport {
                        outcome: FillOutcome::Full,
                        attempts,
                        acquired,
                    });
                }
            }
        }
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the buffer holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Fixed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear samples; capacity is untouched
    pub fn reset(&mut self) {
        self.samples.clear();
        observability::record_buffer_depth(0);
    }

    /// Buffered samples in acquisition order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Take all samples out, leaving an empty buffer
    pub fn drain(&mut self) -> Vec<Sample> {
        observability::record_buffer_depth(0);
        std::mem::take(&mut self.samples)
    }

    /// Access the capture strategy (for stats readout)
    pub fn capture(&self) -> &C {
        &self.capture
    }
}
