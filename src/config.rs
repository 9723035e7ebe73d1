//! Watch face configuration

use chrono::FixedOffset;

use crate::battery::{self, BatteryLevel};

/// Central European Time
const DEFAULT_UTC_OFFSET_SECS: i32 = 3_600;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Offset of local time from UTC in seconds, east positive
    pub utc_offset_secs: i32,
    /// Battery percentage shown until the first reading arrives
    pub initial_battery: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
            initial_battery: BatteryLevel::INITIAL.percent(),
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<FixedOffset, Error> {
        FixedOffset::east_opt(self.utc_offset_secs).ok_or(Error::InvalidOffset)
    }

    pub fn battery(&self) -> Result<BatteryLevel, Error> {
        BatteryLevel::new(self.initial_battery).map_err(Error::Battery)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// UTC offset is a day or more
    InvalidOffset,
    /// Initial battery level is not a percentage
    Battery(battery::Error),
}
