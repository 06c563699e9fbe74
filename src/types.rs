//! Core types shared by the blink and fade machinery.

/// How many times an effect should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeat {
    /// Run a specific number of cycles. `Times(0)` means the effect does
    /// not start at all.
    Times(u32),

    /// Run until explicitly stopped or replaced.
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(1)
    }
}

/// A brightness range an effect runs between.
///
/// `is_on`/`is_off` queries are relative to these bounds rather than to the
/// absolute 0/255 endpoints, so an effect confined to, say, `40..180` still
/// reports "on" at its configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Range {
    /// Lower brightness bound.
    pub min: u8,
    /// Upper brightness bound.
    pub max: u8,
}

impl Range {
    /// The full 0-255 scale.
    pub const FULL: Range = Range { min: 0, max: 255 };

    /// Creates a range, swapping the endpoints if they are reversed.
    pub fn new(min: u8, max: u8) -> Self {
        if min <= max {
            Range { min, max }
        } else {
            Range { min: max, max: min }
        }
    }

    /// Clamps a level into this range.
    pub fn clamp(&self, level: u8) -> u8 {
        level.max(self.min).min(self.max)
    }

    /// Distance between the bounds.
    pub fn span(&self) -> u8 {
        self.max.saturating_sub(self.min)
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_defaults_to_a_single_cycle() {
        assert_eq!(Repeat::default(), Repeat::Times(1));
    }

    #[test]
    fn range_constructor_normalizes_reversed_endpoints() {
        let range = Range::new(200, 10);
        assert_eq!(range.min, 10);
        assert_eq!(range.max, 200);
    }

    #[test]
    fn range_clamps_levels_to_its_bounds() {
        let range = Range::new(40, 180);
        assert_eq!(range.clamp(0), 40);
        assert_eq!(range.clamp(100), 100);
        assert_eq!(range.clamp(255), 180);
    }

    #[test]
    fn full_range_spans_the_whole_scale() {
        assert_eq!(Range::FULL.span(), 255);
        assert_eq!(Range::default(), Range::FULL);
    }
}
