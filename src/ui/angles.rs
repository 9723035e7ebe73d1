//! Hand angles
//!
//! All angles are in degrees, clockwise from twelve o'clock.

use chrono::Timelike;

/// Degrees per minute or second on the dial (360 / 60)
const DEG_PER_TICK: f32 = 6.0;
/// Degrees per hour on the dial (360 / 12)
const DEG_PER_HOUR: f32 = 30.0;

/// Rotation of the three time hands for one instant
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandAngles {
    pub hours: f32,
    pub minutes: f32,
    pub seconds: f32,
}

impl HandAngles {
    /// Compute hand angles from clock components.
    ///
    /// `hour` is taken modulo 12. Seconds sweep continuously with the
    /// milliseconds, minutes jump once per minute and the hour hand moves
    /// half a degree per minute.
    pub fn new(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        let seconds = (second as f32 + millisecond as f32 / 1000.0) * DEG_PER_TICK;
        let minutes = minute as f32 * DEG_PER_TICK;
        let hour_offset = minute as f32 / 2.0;
        let hours = (hour % 12) as f32 * DEG_PER_HOUR + hour_offset;

        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Compute hand angles from a local time.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono reports a leap second as nanosecond >= 1e9; keep it in second 59
        let millisecond = time.nanosecond().min(999_999_999) / 1_000_000;
        Self::new(time.hour(), time.minute(), time.second(), millisecond)
    }
}

/// Rotation of the battery hand for a charge level in percent.
///
/// The hand sweeps half a circle: 0 % is -90°, 50 % is upright, 100 % is +90°.
pub fn battery_angle(percent: u8) -> f32 {
    // 1.8° per percent, as 9/5 so every step is correctly rounded
    (percent as f32 * 9.0) / 5.0 - 90.0
}
