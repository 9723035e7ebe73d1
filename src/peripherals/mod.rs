//! Drivers for the PineTime hardware used by the watch face

pub mod backlight;
pub mod battery;
pub mod button;
pub mod config;
pub mod display;
