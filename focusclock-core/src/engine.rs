//! Mode state machine and the countdown/count-up driver
//!
//! [`TimeModeEngine`] owns the single authoritative [`TimerState`]. User
//! actions mutate it through the methods below; the shell's tick driver
//! calls [`TimeModeEngine::tick`] once per second while the engine reports
//! itself as running. All per-mode advancement lives in [`step`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::duration::{CustomDuration, Preset};
use crate::mode::Mode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("duration cannot change while the timer is running")]
    DurationLocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub is_running: bool,
    pub configured_duration_secs: u64,
    /// Remaining seconds in Timer mode, elapsed seconds in Stopwatch mode.
    /// Ignored in Clock mode.
    pub value_secs: u64,
}

impl TimerState {
    pub fn new(configured_duration_secs: u64) -> Self {
        Self {
            mode: Mode::Clock,
            is_running: false,
            configured_duration_secs,
            value_secs: configured_duration_secs,
        }
    }

    /// Value the counter takes when `mode` is entered or reset.
    fn reset_value(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Timer => self.configured_duration_secs,
            Mode::Stopwatch => 0,
            Mode::Clock => self.value_secs,
        }
    }
}

/// Result of advancing a state by some number of seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: TimerState,
    /// Set when a running timer went from a positive value to zero.
    pub completed: bool,
}

/// Advances `state` by `elapsed_secs` of running time.
///
/// Paused states and Clock mode come back unchanged.
pub fn step(state: &TimerState, elapsed_secs: u64) -> Step {
    let mut next = state.clone();
    if !state.is_running {
        return Step {
            state: next,
            completed: false,
        };
    }
    let completed = match state.mode {
        Mode::Clock => false,
        Mode::Timer => {
            next.value_secs = state.value_secs.saturating_sub(elapsed_secs);
            state.value_secs > 0 && next.value_secs == 0
        }
        Mode::Stopwatch => {
            next.value_secs = state.value_secs.saturating_add(elapsed_secs);
            false
        }
    };
    Step {
        state: next,
        completed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or in Clock mode.
    Idle,
    Advanced,
    /// The timer just reached zero. Fires once per crossing.
    Completed,
}

#[derive(Debug, Clone)]
pub struct TimeModeEngine {
    state: TimerState,
}

impl Default for TimeModeEngine {
    fn default() -> Self {
        Self::new(crate::DEFAULT_TIMER_MINUTES * 60)
    }
}

impl TimeModeEngine {
    pub fn new(configured_duration_secs: u64) -> Self {
        Self {
            state: TimerState::new(configured_duration_secs),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn value_secs(&self) -> u64 {
        self.state.value_secs
    }

    pub fn configured_duration_secs(&self) -> u64 {
        self.state.configured_duration_secs
    }

    /// Clock -> Timer -> Stopwatch -> Clock. Always leaves the engine paused.
    pub fn toggle_mode(&mut self) -> Mode {
        let next = self.state.mode.next();
        self.state.value_secs = self.state.reset_value(next);
        self.state.mode = next;
        self.state.is_running = false;
        debug!(mode = ?next, value = self.state.value_secs, "mode toggled");
        next
    }

    /// Starts counting. Returns whether the engine actually started; Clock
    /// mode has nothing to run.
    pub fn start(&mut self) -> bool {
        if self.state.is_running || !self.state.mode.has_counter() {
            return false;
        }
        self.state.is_running = true;
        debug!(mode = ?self.state.mode, value = self.state.value_secs, "started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.state.is_running {
            return false;
        }
        self.state.is_running = false;
        debug!(mode = ?self.state.mode, value = self.state.value_secs, "paused");
        true
    }

    /// The single start/pause control.
    pub fn toggle_running(&mut self) -> bool {
        if self.state.is_running {
            self.pause();
        } else {
            self.start();
        }
        self.state.is_running
    }

    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.value_secs = self.state.reset_value(self.state.mode);
        debug!(mode = ?self.state.mode, value = self.state.value_secs, "reset");
    }

    /// Changes the configured countdown length.
    ///
    /// Refused while running so a countdown never changes under the user.
    /// In Timer mode the remaining time jumps to the new duration.
    pub fn set_duration(&mut self, seconds: u64) -> Result<(), EngineError> {
        if self.state.is_running {
            return Err(EngineError::DurationLocked);
        }
        self.state.configured_duration_secs = seconds;
        if self.state.mode == Mode::Timer {
            self.state.value_secs = seconds;
        }
        debug!(seconds, "duration set");
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), EngineError> {
        self.set_duration(preset.seconds())
    }

    pub fn apply_custom(&mut self, custom: &CustomDuration) -> Result<(), EngineError> {
        self.set_duration(custom.total_seconds())
    }

    /// One second of driver time.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running || !self.state.mode.has_counter() {
            return TickOutcome::Idle;
        }
        let Step { state, completed } = step(&self.state, 1);
        self.state = state;
        if completed {
            debug!("timer reached zero");
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn timer(seconds: u64) -> TimeModeEngine {
        let mut engine = TimeModeEngine::new(seconds);
        engine.toggle_mode();
        engine
    }

    #[test]
    fn starts_in_clock_with_default_duration() {
        let engine = TimeModeEngine::default();
        assert_eq!(engine.mode(), Mode::Clock);
        assert!(!engine.is_running());
        assert_eq!(engine.configured_duration_secs(), 25 * 60);
    }

    #[test]
    fn toggle_mode_resets_values_and_stops() {
        let mut engine = TimeModeEngine::new(90);
        assert_eq!(engine.toggle_mode(), Mode::Timer);
        assert_eq!(engine.value_secs(), 90);

        engine.start();
        engine.tick();
        assert_eq!(engine.toggle_mode(), Mode::Stopwatch);
        assert!(!engine.is_running());
        assert_eq!(engine.value_secs(), 0);

        engine.start();
        engine.tick();
        assert_eq!(engine.toggle_mode(), Mode::Clock);
        assert!(!engine.is_running());
    }

    #[test]
    fn clock_mode_cannot_run() {
        let mut engine = TimeModeEngine::default();
        assert!(!engine.start());
        assert!(!engine.is_running());
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn start_twice_is_a_noop() {
        let mut engine = timer(10);
        assert!(engine.start());
        assert!(!engine.start());
        assert!(engine.is_running());
    }

    #[test]
    fn timer_floors_at_zero_and_completes_once() {
        let mut engine = timer(3);
        engine.start();
        let outcomes: Vec<TickOutcome> = (0..6).map(|_| engine.tick()).collect();
        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Advanced,
                TickOutcome::Advanced,
                TickOutcome::Completed,
                TickOutcome::Advanced,
                TickOutcome::Advanced,
                TickOutcome::Advanced,
            ]
        );
        assert_eq!(engine.value_secs(), 0);
        assert!(engine.is_running());
    }

    #[test]
    fn restarting_at_zero_does_not_complete_again() {
        let mut engine = timer(1);
        engine.start();
        assert_eq!(engine.tick(), TickOutcome::Completed);
        engine.pause();
        engine.start();
        assert_eq!(engine.tick(), TickOutcome::Advanced);
    }

    #[test]
    fn paused_ticks_do_nothing() {
        let mut engine = timer(10);
        engine.start();
        engine.tick();
        engine.pause();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.value_secs(), 9);
    }

    #[test]
    fn reset_restores_per_mode_value() {
        let mut engine = timer(10);
        engine.start();
        engine.tick();
        engine.reset();
        assert!(!engine.is_running());
        assert_eq!(engine.value_secs(), 10);

        engine.toggle_mode();
        engine.start();
        engine.tick();
        engine.reset();
        assert_eq!(engine.value_secs(), 0);
    }

    #[test]
    fn set_duration_is_refused_while_running() {
        let mut engine = timer(10);
        engine.start();
        engine.tick();
        let before = engine.state().clone();
        assert_matches!(engine.set_duration(500), Err(EngineError::DurationLocked));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn set_duration_outside_timer_keeps_value() {
        let mut engine = TimeModeEngine::new(10);
        engine.toggle_mode();
        engine.toggle_mode();
        engine.start();
        engine.tick();
        engine.pause();
        engine.set_duration(300).unwrap();
        assert_eq!(engine.value_secs(), 1);
        assert_eq!(engine.configured_duration_secs(), 300);

        engine.toggle_mode();
        engine.toggle_mode();
        assert_eq!(engine.value_secs(), 300);
    }

    #[test]
    fn step_is_pure() {
        let state = TimerState {
            mode: Mode::Stopwatch,
            is_running: true,
            configured_duration_secs: 0,
            value_secs: 5,
        };
        let next = step(&state, 10);
        assert_eq!(state.value_secs, 5);
        assert_eq!(next.state.value_secs, 15);
        assert!(!next.completed);
    }

    #[test]
    fn step_overshoot_still_completes() {
        let state = TimerState {
            mode: Mode::Timer,
            is_running: true,
            configured_duration_secs: 5,
            value_secs: 2,
        };
        let next = step(&state, 10);
        assert_eq!(next.state.value_secs, 0);
        assert!(next.completed);
    }
}
