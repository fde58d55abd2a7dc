//! Per-port clock reconciliation
//!
//! Devices report a relative millisecond counter (e.g. Arduino `millis()`).
//! The first timestamped record on a port fixes an absolute anchor; from then
//! on port time depends only on the device counter, so inter-sample spacing
//! is exact even when wall-clock reads drift between records.
//!
//! Known limitation: a device counter that wraps or resets mid-run is not
//! detected; samples after the wrap carry times before the anchor.

use chrono::{DateTime, TimeDelta, Utc};

/// Absolute-time anchor for one port's device-relative counter.
///
/// Transitions from unanchored to anchored exactly once and never resets for
/// the life of the port.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockAnchor {
    base: Option<DateTime<Utc>>,
}

impl ClockAnchor {
    /// Create an unanchored clock
    pub const fn new() -> Self {
        Self { base: None }
    }

    /// Whether the anchor has been fixed
    pub fn is_anchored(&self) -> bool {
        self.base.is_some()
    }

    /// Convert a device-relative millisecond value to absolute time.
    ///
    /// On the first call the anchor is fixed as `now - device_ms`; every call
    /// returns `anchor + device_ms`. Returns `None` only when the counter
    /// value cannot be represented as a duration, in which case the caller
    /// falls back to wall-clock time and the anchor stays untouched.
    pub fn resolve(&mut self, device_ms: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let offset = TimeDelta::try_milliseconds(device_ms)?;
        let base = *self.base.get_or_insert(now - offset);
        Some(base + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, seconds).unwrap()
    }

    #[test]
    fn test_first_resolve_anchors() {
        let mut clock = ClockAnchor::new();
        assert!(!clock.is_anchored());

        let t = clock.resolve(1_000, at(10)).unwrap();
        assert!(clock.is_anchored());
        assert_eq!(t, at(10));
    }

    #[test]
    fn test_spacing_ignores_wall_clock_skew() {
        let mut clock = ClockAnchor::new();
        let first = clock.resolve(1_000, at(10)).unwrap();

        // Wall clock jumped 7 seconds, device advanced only 500 ms
        let second = clock.resolve(1_500, at(17)).unwrap();
        assert_eq!(second - first, TimeDelta::milliseconds(500));
    }

    #[test]
    fn test_anchor_never_reset() {
        let mut clock = ClockAnchor::new();
        let anchor_time = clock.resolve(0, at(10)).unwrap();

        clock.resolve(100, at(30)).unwrap();
        let back_to_zero = clock.resolve(0, at(45)).unwrap();
        assert_eq!(back_to_zero, anchor_time);
    }

    #[test]
    fn test_unrepresentable_counter_rejected() {
        let mut clock = ClockAnchor::new();
        assert!(clock.resolve(i64::MAX, at(10)).is_none());
        assert!(!clock.is_anchored());
    }
}
