//! Wall-clock helpers for the presenter.
//!
//! `draw_web()` calls at ~60fps with variable delta. [`Interval`] turns those
//! frames into whole elapsed periods (the 1 s auto-click tick) and [`Pulse`]
//! is a one-shot countdown (the 500 ms "+N" flash). Both are fed
//! timestamps, never read a clock themselves, so they are fully testable.

/// Fixed-period clock using an accumulator.
pub struct Interval {
    /// Milliseconds per period (e.g. 1000 for once a second)
    period_ms: f64,
    /// Accumulated milliseconds not yet consumed as periods
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1) as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar).
    /// Returns how many whole periods completed since the previous call,
    /// including every period a backgrounded tab skipped.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let fired = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= fired as f64 * self.period_ms;
        fired
    }

    /// Start a fresh period from `now_ms`, discarding any partial one.
    pub fn reset(&mut self, now_ms: f64) {
        self.accumulator = 0.0;
        self.last_timestamp = Some(now_ms);
    }
}

/// One-shot timer: armed with a duration, reports expiry once.
#[derive(Default)]
pub struct Pulse {
    deadline: Option<f64>,
}

impl Pulse {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arm so the pulse expires `duration_ms` after `now_ms`.
    pub fn trigger(&mut self, now_ms: f64, duration_ms: u32) {
        self.deadline = Some(now_ms + duration_ms as f64);
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first update at or past the deadline.
    pub fn update(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
