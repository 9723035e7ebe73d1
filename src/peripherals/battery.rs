//! Battery sampling
//!
//! Voltage measurement as described on https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};
use pinetime_analog::BatteryReading;

/// Battery voltage divider on P0.31 and the charge indication pin
pub struct Battery<'d> {
    adc: Saadc<'d, 1>,
    /// High = battery, low = charging
    charge_indication: Input<'d, P0_12>,
}

impl<'d> Battery<'d> {
    /// `adc` must sample P0.31 at 12 bit resolution.
    pub fn init(adc: Saadc<'d, 1>, charge_indication: Input<'d, P0_12>) -> Self {
        Self {
            adc,
            charge_indication,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.charge_indication.is_low()
    }

    /// Sample the battery, reported in percent.
    pub async fn reading(&mut self) -> BatteryReading {
        let millivolts = self.voltage().await;
        BatteryReading::percent(percent_from_millivolts(millivolts))
    }

    /// Battery voltage in millivolts
    async fn voltage(&mut self) -> u16 {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        // Half the battery voltage against the 3.3 V reference, 2^12 steps.
        // Noise can push the sample slightly below zero.
        (buf[0].max(0) as u32 * 2000 / 1241) as u16
    }
}

/// Piecewise linear estimate of the remaining capacity.
fn percent_from_millivolts(millivolts: u16) -> u8 {
    (match millivolts {
        0..=3449 => 0,
        3450..=3699 => (millivolts - 3450) / 5,
        3700..=4199 => 50 + (millivolts - 3700) / 10,
        _ => 100,
    }) as u8
}
