//! Restartable countdown timer used to gate effect phases.

use crate::time::{TimeDuration, TimeInstant};

/// A restartable countdown over an injected monotonic clock.
///
/// The timer stores a timeout and the instant it was last restarted; all
/// queries take `now` as a parameter so the timer itself never touches the
/// clock. Elapsed time is always derived through
/// [`TimeInstant::duration_since`], which keeps every comparison valid
/// across a tick-counter rollover.
///
/// A timer that has never been restarted reports expired, and a zero
/// timeout is treated as already elapsed (`percent_elapsed` is `1.0`), so
/// ramp interpolation never divides by zero.
pub struct Timer<I: TimeInstant> {
    timeout: I::Duration,
    start: Option<I>,
}

impl<I: TimeInstant> Timer<I> {
    /// Creates an unarmed timer with a zero timeout.
    pub fn new() -> Self {
        Self {
            timeout: I::Duration::ZERO,
            start: None,
        }
    }

    /// Stores a new timeout. Does not start counting.
    pub fn set_timeout(&mut self, timeout: I::Duration) {
        self.timeout = timeout;
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> I::Duration {
        self.timeout
    }

    /// Captures `now` as the new start instant.
    pub fn restart(&mut self, now: I) {
        self.start = Some(now);
    }

    /// True while the timer has been restarted and its timeout has not
    /// elapsed yet.
    pub fn is_active(&self, now: I) -> bool {
        match self.start {
            Some(start) => now.duration_since(start).as_millis() < self.timeout.as_millis(),
            None => false,
        }
    }

    /// True once the timeout has elapsed (or the timer was never restarted).
    pub fn is_expired(&self, now: I) -> bool {
        !self.is_active(now)
    }

    /// Fraction of the timeout that has elapsed, clamped to `0.0..=1.0`.
    pub fn percent_elapsed(&self, now: I) -> f32 {
        let timeout = self.timeout.as_millis();
        if timeout == 0 {
            return 1.0;
        }
        match self.start {
            Some(start) => {
                let elapsed = now.duration_since(start).as_millis();
                (elapsed as f32 / timeout as f32).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    /// `1.0 - percent_elapsed`, used for falling ramps.
    pub fn inverse_percent_elapsed(&self, now: I) -> f32 {
        1.0 - self.percent_elapsed(now)
    }
}

impl<I: TimeInstant> Default for Timer<I> {
    fn default() -> Self {
        Self::new()
    }
}
