//! Backlight control
//!
//! Based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/backlight.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::gpio::{AnyPin, Output};

/// Highest brightness level
pub const MAX_BRIGHTNESS: u8 = 7;

/// Three active-low pins, each switching a FET that powers the backlight
/// through a resistor.
///
/// - Low: 2.2 kΩ
/// - Mid: 100 Ω
/// - High: 30 Ω
///
/// Their combinations give 7 brightness levels plus off.
pub struct Backlight {
    low: Output<'static, AnyPin>,
    mid: Output<'static, AnyPin>,
    high: Output<'static, AnyPin>,
}

impl Backlight {
    pub fn init(
        low: Output<'static, AnyPin>,
        mid: Output<'static, AnyPin>,
        high: Output<'static, AnyPin>,
        brightness: u8,
    ) -> Self {
        let mut backlight = Self { low, mid, high };
        backlight.set(brightness);
        backlight
    }

    /// Set the brightness between 0 (off) and [`MAX_BRIGHTNESS`], clamping
    /// higher values.
    pub fn set(&mut self, brightness: u8) {
        let brightness = brightness.min(MAX_BRIGHTNESS);
        defmt::debug!("Backlight brightness {}", brightness);

        for (bit, pin) in [(0x01, &mut self.low), (0x02, &mut self.mid), (0x04, &mut self.high)] {
            if brightness & bit > 0 {
                pin.set_low();
            } else {
                pin.set_high();
            }
        }
    }
}
