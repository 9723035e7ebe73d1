//! Battery level as shown by the battery hand
//!
//! The battery source reports a raw level and the scale it is measured
//! against. Readings that do not describe a charge between 0 and 100 % are
//! rejected so the hand keeps its last valid position.

use crate::ui::angles::battery_angle;

/// Raw battery report, `level` out of `scale`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    pub level: i32,
    pub scale: i32,
}

impl BatteryReading {
    /// Reading already expressed in percent
    pub const fn percent(percent: u8) -> Self {
        Self {
            level: percent as i32,
            scale: 100,
        }
    }
}

/// Battery charge in percent (0-100)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Level assumed until the first reading arrives
    pub const INITIAL: BatteryLevel = BatteryLevel(50);

    pub fn new(percent: u8) -> Result<Self, Error> {
        match percent {
            0..=100 => Ok(Self(percent)),
            _ => Err(Error::OutOfRange),
        }
    }

    /// Convert a raw reading, truncating the percentage toward zero.
    pub fn from_reading(reading: BatteryReading) -> Result<Self, Error> {
        if reading.scale <= 0 {
            return Err(Error::InvalidScale);
        }
        if reading.level < 0 {
            return Err(Error::InvalidLevel);
        }

        // Integer division, so the percentage is always a finite number
        let percent = i64::from(reading.level) * 100 / i64::from(reading.scale);
        u8::try_from(percent)
            .map_err(|_| Error::OutOfRange)
            .and_then(Self::new)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Rotation of the battery hand in degrees, -90 (empty) to +90 (full).
    pub fn angle(&self) -> f32 {
        battery_angle(self.0)
    }
}

impl Default for BatteryLevel {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Scale is zero or negative
    InvalidScale,
    /// Level is negative, usually a missing value
    InvalidLevel,
    /// Percentage above 100
    OutOfRange,
}
