//! Side button

use debouncr::{debounce_2, Debouncer, Edge, Repeat2};
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_13, P0_15},
};
use embassy_time::{Duration, Timer};

/// Poll interval; a press is accepted after two stable polls
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct Button<'d> {
    pin: Input<'d, P0_13>,
    /// Powers the button, only held high while polling
    enable: Output<'d, P0_15>,
    debouncer: Debouncer<u8, Repeat2>,
}

impl<'d> Button<'d> {
    pub fn init(pin: Input<'d, P0_13>, enable: Output<'d, P0_15>) -> Self {
        Self {
            pin,
            enable,
            debouncer: debounce_2(false),
        }
    }

    /// Poll once, returns whether the button went down.
    pub async fn pressed(&mut self) -> bool {
        self.enable.set_high();
        // The button needs a short time to give stable outputs
        Timer::after(Duration::from_nanos(1)).await;

        let edge = self.debouncer.update(self.pin.is_high());

        // Button consumes around 34µA when P0.15 is left high.
        self.enable.set_low();

        edge == Some(Edge::Rising)
    }

    /// Wait for the next debounced press.
    pub async fn wait_for_press(&mut self) {
        while !self.pressed().await {
            Timer::after(POLL_INTERVAL).await;
        }
    }
}
