//! Pointer-move throttling.
//!
//! A single in-flight flag plus a fixed re-arm interval: a sample arriving
//! while the previous one is still being processed, or before the interval
//! has elapsed, is dropped rather than queued.

use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct PointerThrottle {
    interval: Duration,
    in_flight: bool,
    last_started: Option<Instant>,
    dropped: u64,
}

impl Default for PointerThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl PointerThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            in_flight: false,
            last_started: None,
            dropped: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Claims the slot for a sample arriving at `now`.
    ///
    /// Returns false when the sample must be dropped. A successful call must
    /// be paired with [`finish`](Self::finish).
    pub fn try_begin(&mut self, now: Instant) -> bool {
        let armed = self
            .last_started
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if self.in_flight || !armed {
            self.dropped += 1;
            return false;
        }
        self.in_flight = true;
        self.last_started = Some(now);
        true
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Samples dropped since creation or the last reset.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Re-arms immediately, e.g. after the pointer left the chart.
    pub fn reset(&mut self) {
        self.in_flight = false;
        self.last_started = None;
        self.dropped = 0;
    }
}
