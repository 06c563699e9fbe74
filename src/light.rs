//! Non-blocking light controller with blink and fade state machines.
//!
//! Provides [`Light`] which drives a single dimmable output through steady
//! on/off, periodic blinking and four-phase fading, all from a cooperative
//! [`service`](Light::service) call. Timing comes from an injected
//! [`TimeSource`]; levels reach hardware through an owned [`OutputDriver`].

use crate::command::LightAction;
use crate::output::{Correction, OutputDriver, PwmOutput};
use crate::time::{TimeInstant, TimeSource};
use crate::timer::Timer;
use crate::types::{Range, Repeat};

/// The current phase of the blink machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// Not blinking.
    Idle,
    /// Output held at the range maximum, waiting for the on-timer.
    On,
    /// Output held at the range minimum, waiting for the off-timer.
    Off,
}

/// The current phase of the fade machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FadeState {
    /// Not fading.
    Idle,
    /// Ramping from the range minimum up to the maximum.
    Rising,
    /// Holding at the range maximum.
    HoldingHigh,
    /// Ramping from the range maximum down to the minimum.
    Falling,
    /// Holding at the range minimum.
    HoldingLow,
}

/// Remaining cycle budget for the active effect.
#[derive(Debug, Clone, Copy)]
struct Cycles {
    remaining: u32,
    forever: bool,
}

impl Cycles {
    fn new(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Times(times) => Cycles {
                remaining: times,
                forever: false,
            },
            Repeat::Forever => Cycles {
                remaining: 0,
                forever: true,
            },
        }
    }

    fn none() -> Self {
        Cycles {
            remaining: 0,
            forever: false,
        }
    }

    fn should_start(&self) -> bool {
        self.forever || self.remaining > 0
    }

    /// Accounts for one completed cycle. Returns true when the budget is
    /// exhausted. Never decrements in forever mode.
    fn finish_cycle(&mut self) -> bool {
        if self.forever {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// Controls a single dimmable output through non-blocking effects.
///
/// Each light owns its output driver and its four phase timers, so
/// independent lights never interfere with each other's timing. Effects
/// are mutually exclusive: starting a blink cancels any fade and vice
/// versa.
///
/// The owner is expected to call [`service`](Light::service) on every
/// iteration of its control loop. Servicing is purely a function of
/// elapsed time against the armed timers, so calling it more often only
/// improves timing resolution, and extra calls between phase boundaries
/// cause no hardware writes.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `P` - Output implementation type
/// * `T` - Time source implementation type
pub struct Light<'t, I: TimeInstant, P: PwmOutput, T: TimeSource<I>> {
    driver: OutputDriver<P>,
    time_source: &'t T,
    up_timer: Timer<I>,
    on_timer: Timer<I>,
    down_timer: Timer<I>,
    off_timer: Timer<I>,
    blink: BlinkState,
    fade: FadeState,
    cycles: Cycles,
}

impl<'t, I: TimeInstant, P: PwmOutput, T: TimeSource<I>> Light<'t, I, P, T> {
    /// Creates an idle light with the output driven to zero.
    pub fn new(output: P, time_source: &'t T) -> Self {
        Self::with_correction(output, time_source, Correction::Linear)
    }

    /// Creates an idle light with the given perceptual correction mode.
    pub fn with_correction(output: P, time_source: &'t T, correction: Correction) -> Self {
        Self {
            driver: OutputDriver::new(output, correction),
            time_source,
            up_timer: Timer::new(),
            on_timer: Timer::new(),
            down_timer: Timer::new(),
            off_timer: Timer::new(),
            blink: BlinkState::Idle,
            fade: FadeState::Idle,
            cycles: Cycles::none(),
        }
    }

    /// Drives the output to the active range maximum.
    ///
    /// Cancels any running blink or fade (override semantics).
    pub fn on(&mut self) {
        self.stop();
        let max = self.driver.bounds().max;
        self.driver.apply(max);
    }

    /// Drives the output to the active range minimum.
    ///
    /// Cancels any running blink or fade (override semantics).
    pub fn off(&mut self) {
        self.stop();
        let min = self.driver.bounds().min;
        self.driver.apply(min);
    }

    /// True when the current level is at or above the active maximum.
    pub fn is_on(&self) -> bool {
        self.driver.is_on()
    }

    /// True when the current level is at or below the active minimum.
    pub fn is_off(&self) -> bool {
        self.driver.is_off()
    }

    /// Sets the brightness directly, clamped to the active range.
    ///
    /// Cancels any running blink or fade.
    pub fn set_brightness(&mut self, level: u8) {
        self.stop();
        self.driver.apply(level);
    }

    /// Sets the brightness from a 0-100 percentage.
    ///
    /// Cancels any running blink or fade.
    pub fn set_brightness_percent(&mut self, percent: u8) {
        let percent = percent.min(100) as u16;
        self.set_brightness((percent * 255 / 100) as u8);
    }

    /// Returns the current brightness level.
    pub fn brightness(&self) -> u8 {
        self.driver.current()
    }

    /// Returns the current brightness as a rounded 0-100 percentage.
    pub fn brightness_percent(&self) -> u8 {
        ((self.driver.current() as u32 * 100 + 127) / 255) as u8
    }

    /// Starts blinking over the full 0-255 range.
    ///
    /// See [`blink_range`](Light::blink_range).
    pub fn blink(&mut self, on_time: I::Duration, off_time: I::Duration, repeat: Repeat) {
        self.blink_range(on_time, off_time, Range::FULL, repeat);
    }

    /// Starts blinking between the bounds of `range`.
    ///
    /// Cancels any running fade, then immediately enters the on phase:
    /// the output is driven to the range maximum and the on-timer armed.
    /// One cycle is counted per completed on phase. `Repeat::Times(0)`
    /// is a valid no-op start: the light stays idle and nothing is
    /// written.
    pub fn blink_range(
        &mut self,
        on_time: I::Duration,
        off_time: I::Duration,
        range: Range,
        repeat: Repeat,
    ) {
        self.on_timer.set_timeout(on_time);
        self.off_timer.set_timeout(off_time);
        self.driver.set_bounds(range);
        self.stop();

        let cycles = Cycles::new(repeat);
        if !cycles.should_start() {
            return;
        }
        self.cycles = cycles;

        let now = self.time_source.now();
        self.blink_on(now);
    }

    /// Starts fading over the full 0-255 range.
    ///
    /// See [`fade_range`](Light::fade_range).
    pub fn fade(
        &mut self,
        up_time: I::Duration,
        on_time: I::Duration,
        down_time: I::Duration,
        off_time: I::Duration,
        repeat: Repeat,
    ) {
        self.fade_range(up_time, on_time, down_time, off_time, Range::FULL, repeat);
    }

    /// Starts fading between the bounds of `range`.
    ///
    /// Each cycle ramps from min to max over `up_time`, holds at max for
    /// `on_time`, ramps back down over `down_time` and holds at min for
    /// `off_time`. Cancels any running blink. `Repeat::Times(0)` is a
    /// valid no-op start.
    pub fn fade_range(
        &mut self,
        up_time: I::Duration,
        on_time: I::Duration,
        down_time: I::Duration,
        off_time: I::Duration,
        range: Range,
        repeat: Repeat,
    ) {
        self.up_timer.set_timeout(up_time);
        self.on_timer.set_timeout(on_time);
        self.down_timer.set_timeout(down_time);
        self.off_timer.set_timeout(off_time);
        self.driver.set_bounds(range);
        self.stop();

        let cycles = Cycles::new(repeat);
        if !cycles.should_start() {
            return;
        }
        self.cycles = cycles;

        let now = self.time_source.now();
        self.up_timer.restart(now);
        self.fade = FadeState::Rising;
    }

    /// Halts any running blink or fade, leaving the output level as-is.
    pub fn stop(&mut self) {
        self.blink = BlinkState::Idle;
        self.fade = FadeState::Idle;
    }

    /// Advances the active effect. Call this from your control loop.
    ///
    /// Reads the clock once, then steps whichever state machine is armed.
    /// Safe to call at arbitrary frequency.
    pub fn service(&mut self) {
        let now = self.time_source.now();

        if self.blink != BlinkState::Idle {
            self.service_blink(now);
        }
        if self.fade != FadeState::Idle {
            self.service_fade(now);
        }
    }

    /// True while a blink is running.
    pub fn is_blinking(&self) -> bool {
        self.blink != BlinkState::Idle
    }

    /// True while a fade is running.
    pub fn is_fading(&self) -> bool {
        self.fade != FadeState::Idle
    }

    /// Returns the blink machine's current phase.
    pub fn blink_state(&self) -> BlinkState {
        self.blink
    }

    /// Returns the fade machine's current phase.
    pub fn fade_state(&self) -> FadeState {
        self.fade
    }

    /// Returns the active brightness range.
    pub fn range(&self) -> Range {
        self.driver.bounds()
    }

    /// Handles an action by dispatching to the appropriate method.
    ///
    /// This is a convenience method for command-based control, allowing
    /// actions to be dispatched without matching on the action type
    /// manually.
    pub fn handle_action(&mut self, action: LightAction<I::Duration>) {
        match action {
            LightAction::On => self.on(),
            LightAction::Off => self.off(),
            LightAction::SetBrightness(level) => self.set_brightness(level),
            LightAction::SetBrightnessPercent(percent) => self.set_brightness_percent(percent),
            LightAction::Blink {
                on_time,
                off_time,
                repeat,
            } => self.blink(on_time, off_time, repeat),
            LightAction::Fade {
                up_time,
                on_time,
                down_time,
                off_time,
                repeat,
            } => self.fade(up_time, on_time, down_time, off_time, repeat),
            LightAction::Stop => self.stop(),
        }
    }

    fn service_blink(&mut self, now: I) {
        if self.driver.is_on() {
            if self.on_timer.is_expired(now) {
                self.blink_off(now);
            }
        } else if self.driver.is_off() {
            if self.off_timer.is_expired(now) {
                self.blink_on(now);
            }
        } else {
            // Mid-ramp leftover, e.g. a fade was replaced partway through.
            // Resync by forcing the on phase right away.
            self.blink_on(now);
        }
    }

    fn blink_on(&mut self, now: I) {
        let max = self.driver.bounds().max;
        self.driver.apply(max);
        self.on_timer.restart(now);
        self.blink = BlinkState::On;
    }

    fn blink_off(&mut self, now: I) {
        let min = self.driver.bounds().min;
        self.driver.apply(min);
        self.off_timer.restart(now);

        if self.cycles.finish_cycle() {
            self.blink = BlinkState::Idle;
        } else {
            self.blink = BlinkState::Off;
        }
    }

    fn service_fade(&mut self, now: I) {
        match self.fade {
            FadeState::Rising => {
                if self.up_timer.is_active(now) {
                    let level = self.ramp_level(self.up_timer.percent_elapsed(now));
                    self.driver.apply(level);
                } else {
                    self.on_timer.restart(now);
                    self.fade = FadeState::HoldingHigh;
                    let max = self.driver.bounds().max;
                    self.driver.apply(max);
                }
            }
            FadeState::HoldingHigh => {
                if self.on_timer.is_active(now) {
                    let max = self.driver.bounds().max;
                    self.driver.apply(max);
                } else {
                    self.down_timer.restart(now);
                    self.fade = FadeState::Falling;
                }
            }
            FadeState::Falling => {
                if self.down_timer.is_active(now) {
                    let level = self.ramp_level(self.down_timer.inverse_percent_elapsed(now));
                    self.driver.apply(level);
                } else {
                    self.off_timer.restart(now);
                    self.fade = FadeState::HoldingLow;
                    let min = self.driver.bounds().min;
                    self.driver.apply(min);
                }
            }
            FadeState::HoldingLow => {
                if self.off_timer.is_active(now) {
                    let min = self.driver.bounds().min;
                    self.driver.apply(min);
                } else if self.cycles.finish_cycle() {
                    self.fade = FadeState::Idle;
                } else {
                    self.up_timer.restart(now);
                    self.fade = FadeState::Rising;
                }
            }
            FadeState::Idle => {}
        }
    }

    /// Interpolates a level within the active range. `progress` is the
    /// clamped 0-1 fraction from the gating timer, so the span product
    /// never exceeds the range and the rounding never overflows.
    fn ramp_level(&self, progress: f32) -> u8 {
        let bounds = self.driver.bounds();
        bounds.min + (progress * bounds.span() as f32 + 0.5) as u8
    }
}
