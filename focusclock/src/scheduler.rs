//! Periodic and one-shot timers driving the event loop
//!
//! Every timer is an owned tokio timer held in an `Option`. Cancelling one
//! means dropping it, so once a timer is disarmed nothing it scheduled can
//! fire, whichever path the loop leaves by.

use focusclock_core::Mode;
use std::future::pending;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
pub const COMPLETION_WINDOW: Duration = Duration::from_secs(3);
pub const PULSE_WINDOW: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// One second of timer/stopwatch time.
    Tick,
    /// Re-read the wall clock, or beat the paused timer's overlay.
    Sample,
    CompletionElapsed,
    PulseElapsed,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    ticker: Option<Interval>,
    sampler: Option<Interval>,
    completion: Option<Pin<Box<Sleep>>>,
    pulse: Option<Pin<Box<Sleep>>>,
}

fn one_second_interval() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

async fn elapsed(sleep: &mut Option<Pin<Box<Sleep>>>) {
    match sleep {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms or cancels the periodic timers for the engine's state: the tick
    /// driver only while a counter is running, the sampler in Clock mode and
    /// for a paused timer. Already-armed timers keep their phase.
    pub fn sync(&mut self, mode: Mode, running: bool) {
        let want_ticker = running && mode.has_counter();
        if want_ticker && self.ticker.is_none() {
            self.ticker = Some(one_second_interval());
            debug!("tick driver armed");
        } else if !want_ticker && self.ticker.take().is_some() {
            debug!("tick driver cancelled");
        }

        let want_sampler = match mode {
            Mode::Clock => true,
            Mode::Timer => !running,
            Mode::Stopwatch => false,
        };
        if want_sampler && self.sampler.is_none() {
            self.sampler = Some(one_second_interval());
            debug!(?mode, "sampler armed");
        } else if !want_sampler && self.sampler.take().is_some() {
            debug!(?mode, "sampler cancelled");
        }
    }

    pub fn ticker_armed(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn sampler_armed(&self) -> bool {
        self.sampler.is_some()
    }

    /// Starts (or restarts) the completion banner window.
    pub fn arm_completion(&mut self) {
        self.completion = Some(Box::pin(tokio::time::sleep(COMPLETION_WINDOW)));
    }

    pub fn cancel_completion(&mut self) {
        self.completion = None;
    }

    pub fn arm_pulse(&mut self) {
        self.pulse = Some(Box::pin(tokio::time::sleep(PULSE_WINDOW)));
    }

    pub fn cancel_pulse(&mut self) {
        self.pulse = None;
    }

    pub fn cancel_all(&mut self) {
        self.ticker = None;
        self.sampler = None;
        self.completion = None;
        self.pulse = None;
        debug!("scheduler cleared");
    }

    /// Waits for the next armed timer. Pends forever if none is armed.
    /// One-shot timers are disarmed once they have fired.
    pub async fn next(&mut self) -> Wake {
        let wake = tokio::select! {
            _ = next_tick(&mut self.ticker) => Wake::Tick,
            _ = next_tick(&mut self.sampler) => Wake::Sample,
            _ = elapsed(&mut self.completion) => Wake::CompletionElapsed,
            _ = elapsed(&mut self.pulse) => Wake::PulseElapsed,
        };
        match wake {
            Wake::CompletionElapsed => self.completion = None,
            Wake::PulseElapsed => self.pulse = None,
            Wake::Tick | Wake::Sample => {}
        }
        wake
    }
}
