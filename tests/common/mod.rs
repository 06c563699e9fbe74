//! Shared test infrastructure for pwm-light integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use pwm_light::{PwmOutput, TimeDuration, TimeInstant, TimeSource};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type wrapping a 32-bit tick counter, so integration tests
/// exercise the same rollover arithmetic a real embedded counter has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestInstant(pub u32);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.wrapping_sub(earlier.0) as u64)
    }
}

// ============================================================================
// Mock PWM Output
// ============================================================================

/// Mock output that records every hardware write for testing.
///
/// Cloning shares the underlying history, so a test can keep a handle
/// while the light owns the output.
#[derive(Clone)]
pub struct MockPwm {
    writes: Rc<RefCell<heapless::Vec<u8, 64>>>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self {
            writes: Rc::new(RefCell::new(heapless::Vec::new())),
        }
    }

    /// The most recent write, if any.
    pub fn last_write(&self) -> Option<u8> {
        self.writes.borrow().last().copied()
    }

    /// Number of hardware writes so far (including the construction write).
    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    /// Full write history.
    pub fn history(&self) -> Vec<u8> {
        self.writes.borrow().iter().copied().collect()
    }
}

impl PwmOutput for MockPwm {
    fn write(&mut self, level: u8) {
        let _ = self.writes.borrow_mut().push(level);
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Starts the clock at an arbitrary tick value (e.g. near rollover).
    pub fn starting_at(tick: u32) -> Self {
        Self {
            current_time: Cell::new(TestInstant(tick)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time
            .set(TestInstant(current.0.wrapping_add(millis)));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}
