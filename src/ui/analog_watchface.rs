//! Analog watchface
//!
//! Render state of the face: mode, battery level, date label and the layout
//! of the current viewport. Drawing reads the clock once and issues the
//! images and rotations in a fixed order.

use chrono::{Datelike, Timelike};
use embedded_graphics::geometry::Size;

use super::{
    angles::HandAngles,
    date::DateLabel,
    layout::{self, Layout},
    AssetId, AssetSet, Canvas, Mode, Position, Surface, TextStyle,
};
use crate::battery::{self, BatteryLevel, BatteryReading};

/// Analog watch face with hour, minute and second hands, a battery gauge and
/// the day of month
pub struct AnalogWatchFace {
    /// Reference images, unscaled
    assets: AssetSet,
    /// Layout of the current viewport, `None` until the first resize
    layout: Option<Layout>,
    mode: Mode,
    battery: BatteryLevel,
    /// Battery hand rotation, only updated with the battery level
    battery_angle: f32,
    date: DateLabel,
}

impl AnalogWatchFace {
    /// Create new watchface
    pub fn new(assets: AssetSet, battery: BatteryLevel) -> Self {
        Self {
            assets,
            layout: None,
            mode: Mode::default(),
            battery,
            battery_angle: battery.angle(),
            date: DateLabel::from_day(1),
        }
    }

    /// Resolve the layout for a new viewport size.
    ///
    /// On error the previous layout stays in place.
    pub fn resize(&mut self, viewport: Size) -> Result<&Layout, layout::Error> {
        let layout = Layout::resolve(viewport, &self.assets)?;
        Ok(self.layout.insert(layout))
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode, returns whether it changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Apply a battery report.
    ///
    /// A malformed reading leaves the level and the battery hand untouched.
    pub fn update_battery(&mut self, reading: BatteryReading) -> Result<BatteryLevel, battery::Error> {
        let level = BatteryLevel::from_reading(reading)?;
        self.battery = level;
        self.battery_angle = level.angle();
        Ok(level)
    }

    pub fn battery(&self) -> BatteryLevel {
        self.battery
    }

    pub fn battery_angle(&self) -> f32 {
        self.battery_angle
    }

    /// Refresh the date label from a local date.
    pub fn update_date<D: Datelike>(&mut self, date: &D) {
        self.date = DateLabel::from_date(date);
    }

    pub fn date(&self) -> &DateLabel {
        &self.date
    }

    /// Draw the face for local time `now`.
    pub fn draw<T, S>(&mut self, now: &T, surface: &mut S) -> Result<(), DrawError<S::Error>>
    where
        T: Datelike + Timelike,
        S: Surface,
    {
        let layout = self.layout.as_ref().ok_or(DrawError::NoLayout)?;
        self.date = DateLabel::from_date(now);

        let variant = self.mode.variant();
        let angles = HandAngles::from_time(now);
        let assets = &layout.assets;
        let mut canvas = Canvas::new(surface);

        canvas.draw_image(&assets.image(AssetId::Background, variant), Position::ORIGIN)?;

        canvas.save(|canvas| -> Result<(), S::Error> {
            canvas.draw_text(
                self.date.as_str(),
                layout.date_anchor,
                &TextStyle::date(self.mode),
            )?;

            canvas.rotate(self.battery_angle, layout.battery_anchor);
            canvas.draw_image(
                &assets.image(AssetId::BatteryHand, variant),
                layout.battery_origin,
            )
        })?;

        canvas.save(|canvas| -> Result<(), S::Error> {
            canvas.rotate(angles.hours, layout.center);
            canvas.draw_image(&assets.image(AssetId::HourHand, variant), layout.hour_origin)?;

            canvas.rotate(angles.minutes - angles.hours, layout.center);
            canvas.draw_image(
                &assets.image(AssetId::MinuteHand, variant),
                layout.minute_origin,
            )?;

            if self.mode == Mode::Interactive {
                canvas.rotate(angles.seconds - angles.minutes, layout.center);
                canvas.draw_image(
                    &assets.image(AssetId::SecondHand, variant),
                    layout.second_origin,
                )?;
            }
            Ok(())
        })?;

        trace!(
            "Drew {:?} frame at {}:{}:{}",
            self.mode,
            now.hour(),
            now.minute(),
            now.second()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawError<E> {
    /// Draw requested before the first resize
    NoLayout,
    /// The surface failed
    Surface(E),
}

impl<E> From<E> for DrawError<E> {
    fn from(error: E) -> Self {
        DrawError::Surface(error)
    }
}
