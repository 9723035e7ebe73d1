//! Redraw scheduler
//!
//! While the face is visible and interactive it is redrawn once a second, on
//! the wall-clock second boundary. Each wake computes the next delay from the
//! current time, so a late wake never pushes later ones back.

use crate::ui::Mode;

/// Redraw period in interactive mode
pub const INTERACTIVE_UPDATE_RATE_MS: i64 = 1_000;

/// Period of the host time tick
pub const TIME_TICK_RATE_MS: i64 = 60_000;

/// Identifies one scheduled wake
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeToken(u32);

/// Host timer delivering wakes back to [`RedrawScheduler::on_wake`]
pub trait WakeTimer {
    /// Deliver `token` after `delay_ms` milliseconds.
    fn schedule(&mut self, token: WakeToken, delay_ms: u64);

    /// Drop the wake for `token` if it has not fired yet.
    fn cancel(&mut self, token: WakeToken);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
}

/// Delay from `now_ms` (Unix epoch milliseconds) to the next whole second.
///
/// Exactly on a boundary this is a full period, never zero.
pub fn delay_to_next_second(now_ms: i64) -> u64 {
    delay_to_next_boundary(now_ms, INTERACTIVE_UPDATE_RATE_MS)
}

/// Delay from `now_ms` (Unix epoch milliseconds) to the next whole minute,
/// when the time tick is due.
pub fn delay_to_next_minute(now_ms: i64) -> u64 {
    delay_to_next_boundary(now_ms, TIME_TICK_RATE_MS)
}

fn delay_to_next_boundary(now_ms: i64, period_ms: i64) -> u64 {
    (period_ms - now_ms.rem_euclid(period_ms)) as u64
}

pub struct RedrawScheduler {
    visible: bool,
    mode: Mode,
    state: SchedulerState,
    /// Wake currently scheduled with the host timer
    pending: Option<WakeToken>,
    next_token: u32,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RedrawScheduler {
    /// Hidden, interactive and stopped
    pub const fn new() -> Self {
        Self {
            visible: false,
            mode: Mode::Interactive,
            state: SchedulerState::Stopped,
            pending: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pending(&self) -> Option<WakeToken> {
        self.pending
    }

    /// The timer only runs while the face is visible and interactive.
    pub fn should_run(&self) -> bool {
        self.visible && self.mode == Mode::Interactive
    }

    pub fn set_visible<T: WakeTimer>(
        &mut self,
        visible: bool,
        now_ms: i64,
        timer: &mut T,
    ) -> SchedulerState {
        self.visible = visible;
        self.update(now_ms, timer)
    }

    pub fn set_mode<T: WakeTimer>(
        &mut self,
        mode: Mode,
        now_ms: i64,
        timer: &mut T,
    ) -> SchedulerState {
        self.mode = mode;
        self.update(now_ms, timer)
    }

    /// Handle a wake from the timer. Returns whether to redraw.
    ///
    /// Wakes that were cancelled, superseded or arrive after stopping are
    /// ignored.
    pub fn on_wake<T: WakeTimer>(
        &mut self,
        token: WakeToken,
        now_ms: i64,
        timer: &mut T,
    ) -> bool {
        if self.pending != Some(token) || self.state != SchedulerState::Running {
            trace!("Ignoring stale wake {:?}", token);
            return false;
        }
        self.pending = None;

        if self.should_run() {
            self.schedule(now_ms, timer);
        }
        true
    }

    /// Stop for good, e.g. when the face is destroyed.
    pub fn shutdown<T: WakeTimer>(&mut self, timer: &mut T) {
        self.visible = false;
        self.cancel(timer);
        self.state = SchedulerState::Stopped;
    }

    /// Re-evaluate whether the timer runs. A pending wake is always
    /// cancelled first, so at most one wake is ever scheduled.
    fn update<T: WakeTimer>(&mut self, now_ms: i64, timer: &mut T) -> SchedulerState {
        self.cancel(timer);

        let state = if self.should_run() {
            self.schedule(now_ms, timer);
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        };

        if state != self.state {
            debug!("Redraw timer {:?}", state);
        }
        self.state = state;
        state
    }

    fn schedule<T: WakeTimer>(&mut self, now_ms: i64, timer: &mut T) {
        let token = WakeToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);

        timer.schedule(token, delay_to_next_second(now_ms));
        self.pending = Some(token);
    }

    fn cancel<T: WakeTimer>(&mut self, timer: &mut T) {
        if let Some(token) = self.pending.take() {
            timer.cancel(token);
        }
    }
}
