//! Analog watch face core for the PineTime.
//!
//! Turns wall-clock time and battery state into hand rotations and screen
//! positions, and decides when the face has to be redrawn. Everything that
//! touches hardware lives in the firmware binary; this crate only sees
//! explicit inputs and a [`ui::Surface`] to draw on.

#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod battery;
pub mod config;
pub mod engine;
pub mod system;
pub mod ui;

pub use battery::{BatteryLevel, BatteryReading};
pub use config::Config;
pub use engine::Engine;
pub use system::scheduler::{RedrawScheduler, SchedulerState, WakeTimer, WakeToken};
pub use system::time::TimeManager;
pub use ui::{Mode, Surface};
