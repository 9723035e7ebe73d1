//! Date label

use chrono::Datelike;

const BUF_LEN: usize = 4;

/// Day of month as drawn on the dial.
///
/// Days below 10 and the 11th get a leading space so the narrow digits line
/// up inside the date window.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DateLabel {
    str_buf: [u8; BUF_LEN],
    len: usize,
}

impl DateLabel {
    /// Create label for a day of month (1-31)
    pub fn from_day(day: u32) -> Self {
        let mut str_buf = [0; BUF_LEN];
        let text = if day < 10 || day == 11 {
            format_no_std::show(&mut str_buf, format_args!(" {}", day))
        } else {
            format_no_std::show(&mut str_buf, format_args!("{}", day))
        };
        // A chrono day always fits; anything else leaves the label blank
        let len = text.map(str::len).unwrap_or(0);

        Self { str_buf, len }
    }

    /// Create label for the day of a date
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self::from_day(date.day())
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or_default()
    }
}

impl core::fmt::Debug for DateLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("DateLabel").field(&self.as_str()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DateLabel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "DateLabel({=str})", self.as_str())
    }
}
