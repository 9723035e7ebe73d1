#![no_std]
#![no_main]

mod peripherals;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select4, Either4};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pin, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use embassy_time::{Duration, Instant, Ticker, Timer};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::{Backlight, MAX_BRIGHTNESS},
    battery::Battery,
    button::Button,
    config::SystemConfig,
    display::{DialAssets, Display},
};
use pinetime_analog::{
    system::{scheduler::delay_to_next_minute, time::TimeReference},
    ui::AssetSet,
    BatteryReading, Config, Engine, TimeManager, WakeTimer, WakeToken,
};

// Others
use chrono::{DateTime, Utc};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

const BATTERY_INTERVAL: Duration = Duration::from_secs(60);

/// Screen states, cycled by the side button
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum Screen {
    Interactive,
    Ambient,
    Off,
}

impl Screen {
    fn next(self) -> Self {
        match self {
            Screen::Interactive => Screen::Ambient,
            Screen::Ambient => Screen::Off,
            Screen::Off => Screen::Interactive,
        }
    }

    fn brightness(self) -> u8 {
        match self {
            Screen::Interactive => MAX_BRIGHTNESS,
            Screen::Ambient => 1,
            Screen::Off => 0,
        }
    }
}

// Communication channels
static SCREEN: Channel<ThreadModeRawMutex, Screen, 4> = Channel::new();
static BATTERY: Signal<ThreadModeRawMutex, BatteryReading> = Signal::new();

/// Redraw wakes backed by the embassy time driver
#[derive(Default)]
struct EmbassyWakeTimer {
    pending: Option<(WakeToken, Instant)>,
}

impl EmbassyWakeTimer {
    /// Resolves when the pending wake is due, never if there is none.
    async fn fired(&mut self) -> WakeToken {
        match self.pending {
            Some((token, deadline)) => {
                Timer::at(deadline).await;
                self.pending = None;
                token
            }
            None => core::future::pending().await,
        }
    }
}

impl WakeTimer for EmbassyWakeTimer {
    fn schedule(&mut self, token: WakeToken, delay_ms: u64) {
        self.pending = Some((token, Instant::now() + Duration::from_millis(delay_ms)));
    }

    fn cancel(&mut self, token: WakeToken) {
        if matches!(self.pending, Some((pending, _)) if pending == token) {
            self.pending = None;
        }
    }
}

fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

fn draw(engine: &mut Engine, display: &mut Display, now: DateTime<Utc>) {
    if let Err(error) = engine.draw(now, display) {
        defmt::warn!("Frame dropped: {}", error);
    }
}

/// Sample the battery once a minute.
#[embassy_executor::task(pool_size = 1)]
async fn sample_battery(mut battery: Battery<'static>) {
    let mut ticker = Ticker::every(BATTERY_INTERVAL);
    loop {
        let reading = battery.reading().await;
        defmt::debug!(
            "Battery {}% ({})",
            reading.level,
            if battery.is_charging() {
                "charging"
            } else {
                "discharging"
            }
        );
        BATTERY.signal(reading);

        ticker.next().await;
    }
}

/// Cycle the screen state on every button press.
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut button: Button<'static>, mut backlight: Backlight) {
    let mut screen = Screen::Interactive;
    loop {
        button.wait_for_press().await;

        screen = screen.next();
        defmt::info!("Screen {}", screen);
        backlight.set(screen.brightness());
        SCREEN.send(screen).await;
    }
}

/// Owns the watch face and the LCD, draws whenever the engine asks for it.
#[embassy_executor::task(pool_size = 1)]
async fn render(mut engine: Engine, mut display: Display, clock: TimeManager) {
    let mut timer = EmbassyWakeTimer::default();

    let now = clock.now(uptime_ms());
    engine.on_visibility_changed(true, now, &mut timer);
    draw(&mut engine, &mut display, now);

    loop {
        // Time tick on the next wall-clock minute, keeps the ambient face current
        let next_minute = delay_to_next_minute(clock.now(uptime_ms()).timestamp_millis());
        let event = select4(
            SCREEN.receive(),
            BATTERY.wait(),
            timer.fired(),
            Timer::after(Duration::from_millis(next_minute)),
        )
        .await;

        let now = clock.now(uptime_ms());
        let redraw = match event {
            Either4::First(Screen::Interactive) => {
                engine.on_visibility_changed(true, now, &mut timer);
                engine.on_ambient_mode_changed(false, now, &mut timer);
                true
            }
            Either4::First(Screen::Ambient) => {
                engine.on_ambient_mode_changed(true, now, &mut timer)
            }
            Either4::First(Screen::Off) => engine.on_visibility_changed(false, now, &mut timer),
            Either4::Second(reading) => engine.on_battery_changed(reading),
            Either4::Third(token) => engine.on_wake(token, now, &mut timer),
            Either4::Fourth(()) => engine.on_time_tick(),
        };

        if redraw && engine.scheduler().is_visible() {
            draw(&mut engine, &mut display, now);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(SystemConfig::default().into_embassy());
    defmt::info!("Initializing");

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery
    let battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None));

    // Initialize Backlight
    let backlight = Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
        Screen::Interactive.brightness(),
    );

    // Initialize Button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25.degrade(), Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18.degrade(), Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26.degrade(), Level::Low, OutputDrive::Standard),
    ));

    // Initialize watch face
    let config = Config::default();
    let mut engine = unwrap!(Engine::new(unwrap!(AssetSet::load(&DialAssets)), &config));
    unwrap!(engine.on_surface_changed(display.size()));

    // The clock starts at the build time
    let reference = unwrap!(TimeReference::from_epoch_secs(BUILD_EPOCH_SECS, uptime_ms()));
    let clock = TimeManager::init(reference);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(poll_button(button, backlight)));
    unwrap!(spawner.spawn(sample_battery(battery)));
    unwrap!(spawner.spawn(render(engine, display, clock)));
}
