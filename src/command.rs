//! Command-based control for lights.

use crate::time::TimeDuration;
use crate::types::Repeat;

/// Actions for controlling a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightAction<D: TimeDuration> {
    /// Drive to the range maximum, cancelling any effect.
    On,
    /// Drive to the range minimum, cancelling any effect.
    Off,
    /// Set a direct brightness level, cancelling any effect.
    SetBrightness(u8),
    /// Set brightness from a 0-100 percentage, cancelling any effect.
    SetBrightnessPercent(u8),
    /// Start blinking.
    Blink {
        on_time: D,
        off_time: D,
        repeat: Repeat,
    },
    /// Start fading.
    Fade {
        up_time: D,
        on_time: D,
        down_time: D,
        off_time: D,
        repeat: Repeat,
    },
    /// Halt any running effect, keeping the current level.
    Stop,
}

/// Command targeting a specific light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightCommand<Id, D: TimeDuration> {
    pub light_id: Id,
    pub action: LightAction<D>,
}

impl<Id, D: TimeDuration> LightCommand<Id, D> {
    /// Creates command.
    pub fn new(light_id: Id, action: LightAction<D>) -> Self {
        Self { light_id, action }
    }
}
