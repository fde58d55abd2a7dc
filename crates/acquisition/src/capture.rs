//! Capture strategy trait
//!
//! The buffer depends only on this interface; concrete strategies read real
//! hardware or generate synthetic data for self-test.

use std::time::Duration;

use chrono::Utc;
use contracts::{AcquisitionError, Sample};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Result of one capture attempt
#[derive(Debug)]
pub enum CaptureOutcome {
    /// One sample is ready
    Sampled(Sample),

    /// Nothing usable this round; the caller decides whether to retry
    NoData,
}

/// Pluggable single-sample capture strategy
pub trait Capture: Send {
    /// Prepare connections or generator state; idempotent
    fn setup(&mut self) -> Result<(), AcquisitionError>;

    /// Attempt to capture exactly one sample
    fn poll(&mut self) -> Result<CaptureOutcome, AcquisitionError>;
}

/// Self-test strategy generating normally-distributed channel values
pub struct SyntheticCapture {
    channels: usize,
    dist: Normal<f64>,
    rng: StdRng,
    interval: Duration,
}

impl SyntheticCapture {
    /// Create a generator with the given channel count and distribution.
    ///
    /// # Errors
    /// A negative or non-finite standard deviation is a configuration error.
    pub fn new(channels: usize, mean: f64, sd: f64) -> Result<Self, AcquisitionError> {
        let dist = Normal::new(mean, sd).map_err(|e| {
            AcquisitionError::config_validation("sd", format!("invalid distribution: {e}"))
        })?;
        Ok(Self {
            channels,
            dist,
            rng: StdRng::from_os_rng(),
            interval: Duration::ZERO,
        })
    }

    /// Pace sample generation, emulating a device's output rate
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Capture for SyntheticCapture {
    fn setup(&mut self) -> Result<(), AcquisitionError> {
        Ok(())
    }

    fn poll(&mut self) -> Result<CaptureOutcome, AcquisitionError> {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
        let data: Vec<f64> = (0..self.channels)
            .map(|_| self.dist.sample(&mut self.rng))
            .collect();
        Ok(CaptureOutcome::Sampled(Sample {
            time: Utc::now(),
            data,
        }))
    }
}
