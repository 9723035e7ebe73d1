//! Time keeping module for PineTime
//!
//! The watch has no battery-backed clock. Wall-clock time is a reference
//! instant plus the monotonic uptime elapsed since it was taken.

use chrono::{DateTime, TimeDelta, Utc};

/// Wall-clock time paired with the uptime it was valid at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time
    time: DateTime<Utc>,
    /// Related system uptime in milliseconds
    uptime_ms: u64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: DateTime::<Utc>::UNIX_EPOCH,
            uptime_ms: 0,
        }
    }
}

impl TimeReference {
    /// Create new time reference from a UTC date and time
    pub fn new(time: DateTime<Utc>, uptime_ms: u64) -> Self {
        Self { time, uptime_ms }
    }

    /// Create new time reference from seconds since the Unix epoch
    pub fn from_epoch_secs(secs: i64, uptime_ms: u64) -> Result<Self, Error> {
        let time = DateTime::from_timestamp(secs, 0).ok_or(Error::OutOfRange)?;
        Ok(Self::new(time, uptime_ms))
    }
}

/// Clock source of the watch face, in UTC.
///
/// Conversion to local time belongs to the engine, which owns the UTC offset.
#[derive(Clone, Copy, Debug)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Get current UTC time
    pub fn now(&self, uptime_ms: u64) -> DateTime<Utc> {
        let elapsed = uptime_ms.saturating_sub(self.reference.uptime_ms);
        let elapsed = TimeDelta::try_milliseconds(elapsed as i64).unwrap_or(TimeDelta::MAX);
        self.reference
            .time
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        info!("Clock set");
        self.reference = reference;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Timestamp not representable
    OutOfRange,
}
