//! Watch face engine
//!
//! Entry point for the host. Every host event goes through one method here,
//! which updates the render state and the redraw scheduler and tells the
//! host whether the face needs to be drawn again.

use chrono::{DateTime, FixedOffset, Utc};
use embedded_graphics::geometry::Size;

use crate::{
    battery::BatteryReading,
    config::{self, Config},
    system::scheduler::{RedrawScheduler, SchedulerState, WakeTimer, WakeToken},
    ui::{
        layout::{self, Layout},
        AnalogWatchFace, AssetSet, DrawError, Mode, Surface,
    },
};

pub struct Engine {
    face: AnalogWatchFace,
    scheduler: RedrawScheduler,
    timezone: FixedOffset,
}

impl Engine {
    pub fn new(assets: AssetSet, config: &Config) -> Result<Self, config::Error> {
        let timezone = config.timezone()?;
        let battery = config.battery()?;
        info!("Watch face created, battery at {}%", battery.percent());

        Ok(Self {
            face: AnalogWatchFace::new(assets, battery),
            scheduler: RedrawScheduler::new(),
            timezone,
        })
    }

    pub fn face(&self) -> &AnalogWatchFace {
        &self.face
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// The drawing surface got a new size.
    pub fn on_surface_changed(&mut self, size: Size) -> Result<&Layout, layout::Error> {
        self.face.resize(size).map_err(|error| {
            warn!("Rejected surface size {}x{}", size.width, size.height);
            error
        })
    }

    /// Returns whether to redraw.
    pub fn on_visibility_changed<T: WakeTimer>(
        &mut self,
        visible: bool,
        now: DateTime<Utc>,
        timer: &mut T,
    ) -> bool {
        if visible {
            self.refresh_date(now);
        }
        self.scheduler.set_visible(visible, now.timestamp_millis(), timer);
        visible
    }

    /// Returns whether to redraw.
    pub fn on_ambient_mode_changed<T: WakeTimer>(
        &mut self,
        ambient: bool,
        now: DateTime<Utc>,
        timer: &mut T,
    ) -> bool {
        let mode = Mode::from_ambient(ambient);
        let changed = self.face.set_mode(mode);
        self.refresh_date(now);
        self.scheduler.set_mode(mode, now.timestamp_millis(), timer);
        if changed {
            info!("Entering {:?} mode", mode);
        }
        changed
    }

    /// Apply a battery report. Malformed reports are dropped and the battery
    /// hand stays where it was.
    pub fn on_battery_changed(&mut self, reading: BatteryReading) -> bool {
        match self.face.update_battery(reading) {
            Ok(level) => {
                debug!("Battery at {}%", level.percent());
                true
            }
            Err(error) => {
                warn!(
                    "Dropped battery reading {}/{}: {:?}",
                    reading.level, reading.scale, error
                );
                false
            }
        }
    }

    /// Returns whether to redraw.
    pub fn on_time_zone_changed(&mut self, timezone: FixedOffset, now: DateTime<Utc>) -> bool {
        if self.timezone == timezone {
            return false;
        }
        info!("UTC offset now {}s", timezone.local_minus_utc());
        self.timezone = timezone;
        self.refresh_date(now);
        true
    }

    /// Once-a-minute tick from the host, the only redraw trigger in ambient
    /// mode.
    pub fn on_time_tick(&mut self) -> bool {
        self.scheduler.is_visible()
    }

    /// A scheduled wake fired. Returns whether to redraw.
    pub fn on_wake<T: WakeTimer>(
        &mut self,
        token: WakeToken,
        now: DateTime<Utc>,
        timer: &mut T,
    ) -> bool {
        self.scheduler.on_wake(token, now.timestamp_millis(), timer)
    }

    pub fn draw<S: Surface>(
        &mut self,
        now: DateTime<Utc>,
        surface: &mut S,
    ) -> Result<(), DrawError<S::Error>> {
        self.face.draw(&now.with_timezone(&self.timezone), surface)
    }

    /// The face is going away, stop the redraw timer.
    pub fn on_destroy<T: WakeTimer>(&mut self, timer: &mut T) {
        self.scheduler.shutdown(timer);
        debug_assert_eq!(self.scheduler.state(), SchedulerState::Stopped);
    }

    fn refresh_date(&mut self, now: DateTime<Utc>) {
        self.face.update_date(&now.with_timezone(&self.timezone));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        system::scheduler::tests::MockTimer,
        ui::{
            analog_watchface::tests::{Command, RecordingSurface},
            assets::tests::ReferenceAssets,
            AssetId, Position, Variant,
        },
    };
    use chrono::TimeZone;

    fn engine() -> Engine {
        let config = Config {
            utc_offset_secs: 0,
            ..Default::default()
        };
        let assets = AssetSet::load(&ReferenceAssets).unwrap();
        let mut engine = Engine::new(assets, &config).unwrap();
        engine.on_surface_changed(Size::new(390, 390)).unwrap();
        engine
    }

    fn quarter_past_three() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 3, 15, 30).unwrap()
    }

    #[test]
    fn end_to_end_interactive_frame() {
        let mut engine = engine();
        let mut timer = MockTimer::at(quarter_past_three().timestamp_millis());
        assert!(engine.on_battery_changed(BatteryReading::percent(75)));
        assert!(engine.on_visibility_changed(true, quarter_past_three(), &mut timer));

        let mut surface = RecordingSurface::default();
        engine.draw(quarter_past_three(), &mut surface).unwrap();

        let images = surface.images();
        assert_eq!(images.len(), 5);
        assert_eq!(images[1], (AssetId::BatteryHand, Variant::Normal, 45.0));
        assert_eq!(images[2].2, 97.5);
        assert_eq!(images[3].2 - images[2].2, -7.5);
        assert_eq!(images[4].2 - images[3].2, 90.0);
        assert_eq!(engine.scheduler().state(), SchedulerState::Running);
    }

    #[test]
    fn end_to_end_ambient_frame() {
        let mut engine = engine();
        let now = quarter_past_three();
        let mut timer = MockTimer::at(now.timestamp_millis());
        engine.on_battery_changed(BatteryReading::percent(75));
        engine.on_visibility_changed(true, now, &mut timer);

        assert!(engine.on_ambient_mode_changed(true, now, &mut timer));
        assert!(timer.pending.is_none());
        assert!(!engine.on_ambient_mode_changed(true, now, &mut timer));

        let mut surface = RecordingSurface::default();
        engine.draw(now, &mut surface).unwrap();

        let images = surface.images();
        assert_eq!(images.len(), 4);
        assert!(images.iter().all(|(_, variant, _)| *variant == Variant::Ambient));
        assert_eq!(images[3].2 - images[2].2, -7.5);
        assert!(images.iter().all(|(id, _, _)| *id != AssetId::SecondHand));
    }

    #[test]
    fn leaving_ambient_restarts_the_timer() {
        let mut engine = engine();
        let now = quarter_past_three();
        let mut timer = MockTimer::at(now.timestamp_millis());
        engine.on_visibility_changed(true, now, &mut timer);
        engine.on_ambient_mode_changed(true, now, &mut timer);

        assert!(engine.on_ambient_mode_changed(false, now, &mut timer));
        assert_eq!(engine.scheduler().state(), SchedulerState::Running);
        assert_eq!(
            timer.pending.map(|(_, deadline)| deadline),
            Some(now.timestamp_millis() + 1_000)
        );
    }

    #[test]
    fn wakes_redraw_until_hidden() {
        let mut engine = engine();
        let now = quarter_past_three();
        let mut timer = MockTimer::at(now.timestamp_millis());
        engine.on_visibility_changed(true, now, &mut timer);

        let token = timer.fire(3).unwrap();
        let now = Utc.timestamp_millis_opt(timer.now_ms).unwrap();
        assert!(engine.on_wake(token, now, &mut timer));

        let (token, _) = timer.pending.unwrap();
        assert!(!engine.on_visibility_changed(false, now, &mut timer));
        assert!(!engine.on_wake(token, now, &mut timer));
        assert!(!engine.on_time_tick());
    }

    #[test]
    fn time_tick_redraws_visible_face() {
        let mut engine = engine();
        let now = quarter_past_three();
        let mut timer = MockTimer::at(now.timestamp_millis());
        engine.on_ambient_mode_changed(true, now, &mut timer);
        engine.on_visibility_changed(true, now, &mut timer);

        assert!(engine.on_time_tick());
        assert_eq!(timer.scheduled, 0);
    }

    #[test]
    fn malformed_battery_reading_is_dropped() {
        let mut engine = engine();
        engine.on_battery_changed(BatteryReading::percent(75));

        let reading = BatteryReading {
            level: 50,
            scale: -1,
        };
        assert!(!engine.on_battery_changed(reading));
        assert_eq!(engine.face().battery_angle(), 45.0);
    }

    #[test]
    fn time_zone_moves_hands_and_date() {
        let mut engine = engine();
        let now = quarter_past_three();
        let new_york = FixedOffset::west_opt(5 * 3_600).unwrap();

        assert!(engine.on_time_zone_changed(new_york, now));
        assert!(!engine.on_time_zone_changed(new_york, now));
        assert_eq!(engine.face().date().as_str(), " 4");

        // 22:15:30 on the 4th
        let mut surface = RecordingSurface::default();
        engine.draw(now, &mut surface).unwrap();
        assert_eq!(surface.images()[2].2, 307.5);
        assert!(matches!(
            &surface.commands[1],
            Command::Text { text, position, .. }
                if text == " 4" && *position == Position::new(255.0, 275.0)
        ));
    }

    #[test]
    fn rejected_resize_keeps_drawing() {
        let mut engine = engine();
        assert_eq!(
            engine.on_surface_changed(Size::new(390, 0)).err(),
            Some(layout::Error::DegenerateViewport)
        );
        assert!(engine
            .draw(quarter_past_three(), &mut RecordingSurface::default())
            .is_ok());
    }

    #[test]
    fn invalid_configuration_fails_creation() {
        let config = Config {
            utc_offset_secs: 90_000,
            ..Default::default()
        };
        let assets = AssetSet::load(&ReferenceAssets).unwrap();
        assert!(matches!(
            Engine::new(assets, &config),
            Err(config::Error::InvalidOffset)
        ));
    }

    #[test]
    fn destroy_stops_the_timer() {
        let mut engine = engine();
        let now = quarter_past_three();
        let mut timer = MockTimer::at(now.timestamp_millis());
        engine.on_visibility_changed(true, now, &mut timer);

        engine.on_destroy(&mut timer);

        assert!(timer.pending.is_none());
        assert_eq!(engine.scheduler().state(), SchedulerState::Stopped);
    }
}
