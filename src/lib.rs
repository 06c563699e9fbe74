#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Light`**: Drives a single dimmable output through steady on/off, blinking and fading
//! - **`PwmOutput`**: Trait to implement for your output hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`Timer`**: Restartable countdown gating each effect phase
//! - **`Repeat`**: How many cycles to run (`Times(n)` or `Forever`)
//! - **`Range`**: The `[min, max]` brightness bounds an effect runs between
//! - **`Correction`**: Optional perceptual (gamma) correction at the wire
//! - **`LightAction`**: Commands that can be sent to control lights
//!
//! All brightness levels are `u8` PWM duty values in the 0-255 range. The
//! controller never blocks: call [`Light::service`] from your control loop
//! and every call returns after a constant amount of arithmetic and at most
//! one hardware write.

pub mod command;
pub mod light;
pub mod output;
pub mod time;
pub mod timer;
pub mod types;

pub use command::{LightAction, LightCommand};
pub use light::{BlinkState, FadeState, Light};
pub use output::{Correction, OutputDriver, PwmOutput};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::Timer;
pub use types::{Range, Repeat};
