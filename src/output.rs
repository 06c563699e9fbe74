//! Output driver: clamping, write-skipping and perceptual correction.
//!
//! Provides the [`PwmOutput`] trait for hardware abstraction and
//! [`OutputDriver`], the leaf component that applies brightness levels to
//! the hardware while tracking the last applied value.

use crate::types::Range;

/// Trait for abstracting a dimmable hardware output.
///
/// Implement this for your output hardware (PWM timer channel, DAC,
/// LED driver chip, etc.) to allow a light to control it.
pub trait PwmOutput {
    /// Drives the output to the given level.
    ///
    /// Receives the final 0-255 value, after any perceptual correction.
    /// Handle any hardware errors internally - this method cannot fail.
    fn write(&mut self, level: u8);
}

/// Transform applied to a level just before it reaches the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Correction {
    /// Pass levels through unchanged.
    #[default]
    Linear,

    /// Map through a gamma 2.2 lookup so linear level steps appear
    /// perceptually uniform in brightness.
    Gamma,
}

impl Correction {
    fn apply(self, level: u8) -> u8 {
        match self {
            Correction::Linear => level,
            Correction::Gamma => GAMMA8[level as usize],
        }
    }
}

/// Gamma 2.2 lookup table: `round(255 * (i / 255)^2.2)`.
const GAMMA8: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6,
    6, 7, 7, 7, 8, 8, 8, 9, 9, 9, 10, 10, 11, 11, 11, 12,
    12, 13, 13, 13, 14, 14, 15, 15, 16, 16, 17, 17, 18, 18, 19, 19,
    20, 20, 21, 22, 22, 23, 23, 24, 25, 25, 26, 26, 27, 28, 28, 29,
    30, 30, 31, 32, 33, 33, 34, 35, 35, 36, 37, 38, 39, 39, 40, 41,
    42, 43, 43, 44, 45, 46, 47, 48, 49, 49, 50, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71,
    73, 74, 75, 76, 77, 78, 79, 81, 82, 83, 84, 85, 87, 88, 89, 90,
    91, 93, 94, 95, 97, 98, 99, 100, 102, 103, 105, 106, 107, 109, 110, 111,
    113, 114, 116, 117, 119, 120, 121, 123, 124, 126, 127, 129, 130, 132, 133, 135,
    137, 138, 140, 141, 143, 145, 146, 148, 149, 151, 153, 154, 156, 158, 159, 161,
    163, 165, 166, 168, 170, 172, 173, 175, 177, 179, 181, 182, 184, 186, 188, 190,
    192, 194, 196, 197, 199, 201, 203, 205, 207, 209, 211, 213, 215, 217, 219, 221,
    223, 225, 227, 229, 231, 234, 236, 238, 240, 242, 244, 246, 248, 251, 253, 255,
];

/// Applies brightness levels to a hardware output.
///
/// Levels are clamped to the active [`Range`] before being written, the
/// optional [`Correction`] is applied at the wire, and writes that would
/// repeat the last applied level are skipped. The driver tracks the
/// *logical* (pre-correction) level, so range queries are unaffected by
/// the correction mode.
#[derive(Debug)]
pub struct OutputDriver<P: PwmOutput> {
    output: P,
    correction: Correction,
    bounds: Range,
    current: u8,
}

impl<P: PwmOutput> OutputDriver<P> {
    /// Creates a driver over the full 0-255 range and drives the output
    /// to zero so hardware and tracked state agree.
    pub fn new(mut output: P, correction: Correction) -> Self {
        output.write(correction.apply(0));

        Self {
            output,
            correction,
            bounds: Range::FULL,
            current: 0,
        }
    }

    /// Applies a level, clamped to the active bounds.
    ///
    /// No-op when the clamped level equals the last applied value.
    pub fn apply(&mut self, level: u8) {
        let level = self.bounds.clamp(level);
        if level == self.current {
            return;
        }
        self.output.write(self.correction.apply(level));
        self.current = level;
    }

    /// Installs new active bounds for clamping and range queries.
    pub fn set_bounds(&mut self, bounds: Range) {
        self.bounds = bounds;
    }

    /// Returns the active bounds.
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Returns the last applied logical level.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// True when the current level is at or above the active maximum.
    pub fn is_on(&self) -> bool {
        self.current >= self.bounds.max
    }

    /// True when the current level is at or below the active minimum.
    pub fn is_off(&self) -> bool {
        self.current <= self.bounds.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPwm {
        writes: heapless::Vec<u8, 32>,
    }

    impl MockPwm {
        fn new() -> Self {
            Self {
                writes: heapless::Vec::new(),
            }
        }
    }

    impl PwmOutput for MockPwm {
        fn write(&mut self, level: u8) {
            let _ = self.writes.push(level);
        }
    }

    #[test]
    fn construction_drives_the_output_to_zero() {
        let driver = OutputDriver::new(MockPwm::new(), Correction::Linear);
        assert_eq!(driver.output.writes.as_slice(), &[0]);
        assert_eq!(driver.current(), 0);
        assert!(driver.is_off());
        assert!(!driver.is_on());
    }

    #[test]
    fn redundant_applies_are_skipped() {
        let mut driver = OutputDriver::new(MockPwm::new(), Correction::Linear);

        driver.apply(100);
        driver.apply(100);
        driver.apply(100);
        assert_eq!(driver.output.writes.as_slice(), &[0, 100]);

        driver.apply(101);
        assert_eq!(driver.output.writes.as_slice(), &[0, 100, 101]);
    }

    #[test]
    fn levels_are_clamped_to_the_active_bounds() {
        let mut driver = OutputDriver::new(MockPwm::new(), Correction::Linear);
        driver.set_bounds(Range::new(40, 180));

        driver.apply(255);
        assert_eq!(driver.current(), 180);
        assert!(driver.is_on());

        driver.apply(0);
        assert_eq!(driver.current(), 40);
        assert!(driver.is_off());
    }

    #[test]
    fn range_queries_are_relative_to_the_bounds() {
        let mut driver = OutputDriver::new(MockPwm::new(), Correction::Linear);
        driver.set_bounds(Range::new(40, 180));

        driver.apply(110);
        assert!(!driver.is_on());
        assert!(!driver.is_off());

        driver.apply(180);
        assert!(driver.is_on());
    }

    #[test]
    fn gamma_correction_is_applied_at_the_wire_only() {
        let mut driver = OutputDriver::new(MockPwm::new(), Correction::Gamma);

        driver.apply(255);
        driver.apply(128);
        assert_eq!(driver.output.writes.as_slice(), &[0, 255, GAMMA8[128]]);

        // Tracked level stays logical, so range queries still work.
        assert_eq!(driver.current(), 128);
        driver.apply(255);
        assert!(driver.is_on());
    }

    #[test]
    fn gamma_table_endpoints_and_monotonicity() {
        assert_eq!(GAMMA8[0], 0);
        assert_eq!(GAMMA8[255], 255);
        for window in GAMMA8.windows(2) {
            assert!(window[0] <= window[1]);
        }
        // Midpoint dims to roughly a fifth of full scale.
        assert_eq!(GAMMA8[128], 56);
    }
}
