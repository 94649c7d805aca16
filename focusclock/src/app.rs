use crate::config::Config;
use crate::scheduler::{Scheduler, Wake};
use crate::ui::UiLayout;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use focusclock_core::location::parse_timezone;
use focusclock_core::{
    format_display, restore_position, CustomDuration, LocationData, Mode, PositionStore,
    PositionTracker, Preset, TickOutcome, TimeModeEngine, OVERLAY_BOUNDS,
};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::{fx, EffectManager, Motion};
use tracing::{debug, info, warn};

const ANIMATION_TAIL: Duration = Duration::from_millis(1200);

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    #[default]
    Normal,
    SelectingPreset,
    EditingDuration,
}

/// How the currency overlay should look right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OverlayTone {
    /// Running: money coming in.
    Gain,
    /// Paused: money slipping away.
    Loss,
    Idle,
}

pub struct App {
    pub engine: TimeModeEngine,
    pub tracker: PositionTracker,
    store: Box<dyn PositionStore>,
    pub location: LocationData,
    pub timezone_override: Option<Tz>,
    pub mode: InputMode,
    pub custom: CustomDuration,
    pub config: Config,
    pub scheduler: Scheduler,
    pub completion_visible: bool,
    pub pulse_visible: bool,
    pub now: DateTime<Utc>,
    pub notice: Option<String>,
    pub layout: UiLayout,
    pub effect_manager: EffectManager<u32>,
    pub last_frame: Instant,
    animating_until: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, store: Box<dyn PositionStore>) -> Self {
        let tracker = PositionTracker::new(restore_position(&*store), OVERLAY_BOUNDS);
        let timezone_override = config.clock.timezone.as_deref().and_then(parse_timezone);
        let engine = TimeModeEngine::new(config.timer.default_minutes.saturating_mul(60));
        let mut app = Self {
            engine,
            tracker,
            store,
            location: LocationData::fallback(),
            timezone_override,
            mode: InputMode::Normal,
            custom: CustomDuration::default(),
            config,
            scheduler: Scheduler::new(),
            completion_visible: false,
            pulse_visible: false,
            now: Utc::now(),
            notice: None,
            layout: UiLayout::default(),
            effect_manager: EffectManager::default(),
            last_frame: Instant::now(),
            animating_until: None,
            should_quit: false,
        };
        app.sync_scheduler();
        app
    }

    /// Zone the clock renders in: explicit override first, then the
    /// detected one, otherwise local time.
    pub fn timezone(&self) -> Option<Tz> {
        self.timezone_override.or(self.location.timezone)
    }

    pub fn display_text(&self) -> String {
        format_display(
            self.engine.mode(),
            self.engine.value_secs(),
            self.now,
            self.timezone().as_ref(),
        )
    }

    pub fn set_location(&mut self, location: LocationData) {
        debug!(?location, "location applied");
        self.location = location;
    }

    /// Presets and the custom form are only offered for a paused timer.
    pub fn duration_editable(&self) -> bool {
        self.engine.mode() == Mode::Timer && !self.engine.is_running()
    }

    pub fn overlay_visible(&self) -> bool {
        self.engine.mode() == Mode::Timer
    }

    /// Flashes once a second: gain while running, loss while paused.
    pub fn overlay_tone(&self) -> OverlayTone {
        if self.completion_visible || self.engine.value_secs() == 0 || !self.pulse_visible {
            OverlayTone::Idle
        } else if self.engine.is_running() {
            OverlayTone::Gain
        } else {
            OverlayTone::Loss
        }
    }

    pub fn overlay_text(&self) -> String {
        let symbol = &self.location.currency.symbol;
        match self.overlay_tone() {
            OverlayTone::Gain => format!("+{}", symbol),
            OverlayTone::Loss => format!("-{}", symbol),
            OverlayTone::Idle => symbol.clone(),
        }
    }

    pub fn animating(&self) -> bool {
        self.animating_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn sync_scheduler(&mut self) {
        self.scheduler
            .sync(self.engine.mode(), self.engine.is_running());
    }

    fn clear_transients(&mut self) {
        self.completion_visible = false;
        self.pulse_visible = false;
        self.scheduler.cancel_completion();
        self.scheduler.cancel_pulse();
    }

    pub fn toggle_mode(&mut self) {
        self.finish_drag();
        let mode = self.engine.toggle_mode();
        self.clear_transients();
        self.mode = InputMode::Normal;
        if mode == Mode::Clock {
            self.now = Utc::now();
        }
        self.sync_scheduler();
        let area = self.layout.display;
        self.trigger_mode_change_effect(area);
        info!("Switched to {}", mode.label());
    }

    pub fn toggle_running(&mut self) {
        self.engine.toggle_running();
        self.pulse_visible = false;
        self.scheduler.cancel_pulse();
        self.mode = InputMode::Normal;
        self.sync_scheduler();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.clear_transients();
        self.sync_scheduler();
        let area = self.layout.display;
        self.trigger_reset_effect(area);
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        match self.engine.apply_preset(preset) {
            Ok(()) => {
                self.notice = None;
                self.clear_transients();
                info!("Timer set to {}", preset.label());
            }
            Err(e) => {
                debug!("Preset {} refused: {}", preset.label(), e);
                self.notice = Some(e.to_string());
            }
        }
        self.mode = InputMode::Normal;
    }

    pub fn submit_custom(&mut self) {
        match self.engine.apply_custom(&self.custom) {
            Ok(()) => {
                self.notice = None;
                self.clear_transients();
                info!("Timer set to {} seconds", self.custom.total_seconds());
            }
            Err(e) => {
                debug!("Custom duration refused: {}", e);
                self.notice = Some(e.to_string());
            }
        }
        self.mode = InputMode::Normal;
    }

    pub fn on_wake(&mut self, wake: Wake) {
        match wake {
            Wake::Tick => self.on_tick(),
            Wake::Sample => self.on_sample(),
            Wake::CompletionElapsed => self.completion_visible = false,
            Wake::PulseElapsed => self.pulse_visible = false,
        }
    }

    fn on_tick(&mut self) {
        match self.engine.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Advanced => self.pulse(),
            TickOutcome::Completed => self.complete(),
        }
    }

    fn on_sample(&mut self) {
        match self.engine.mode() {
            Mode::Clock => self.now = Utc::now(),
            Mode::Timer => self.pulse(),
            Mode::Stopwatch => {}
        }
    }

    fn pulse(&mut self) {
        if self.engine.mode() == Mode::Timer && self.engine.value_secs() > 0 {
            self.pulse_visible = true;
            self.scheduler.arm_pulse();
        }
    }

    fn complete(&mut self) {
        info!("Focus timer complete");
        self.pulse_visible = false;
        self.scheduler.cancel_pulse();
        self.completion_visible = true;
        self.scheduler.arm_completion();
        let area = self.layout.display;
        self.trigger_complete_effect(area);
        if self.config.timer.notify {
            self.send_notification("Focus complete!", "Your focus timer has finished.");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char(' ') => self.toggle_running(),
                KeyCode::Char('r') => self.reset(),
                KeyCode::Char('m') | KeyCode::Tab => self.toggle_mode(),
                KeyCode::Char('p') if self.duration_editable() => {
                    self.mode = InputMode::SelectingPreset;
                }
                KeyCode::Char('c') if self.duration_editable() => {
                    self.mode = InputMode::EditingDuration;
                }
                KeyCode::Char(c) if c.is_ascii_digit() && self.duration_editable() => {
                    if let Some(preset) = preset_for_digit(c) {
                        self.apply_preset(preset);
                    }
                }
                _ => {}
            },
            InputMode::SelectingPreset => match key.code {
                KeyCode::Esc => self.mode = InputMode::Normal,
                KeyCode::Char('c') => self.mode = InputMode::EditingDuration,
                KeyCode::Char(c) => {
                    if let Some(preset) = preset_for_digit(c) {
                        self.apply_preset(preset);
                    }
                }
                _ => {}
            },
            InputMode::EditingDuration => match key.code {
                KeyCode::Esc => self.mode = InputMode::Normal,
                KeyCode::Enter => self.submit_custom(),
                KeyCode::Backspace => self.custom.backspace(),
                KeyCode::Tab | KeyCode::Right | KeyCode::Char(':') => self.custom.focus_next(),
                KeyCode::Char(c) => self.custom.push_char(c),
                _ => {}
            },
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.overlay_visible() && self.layout.overlay_hit(mouse.column, mouse.row) {
                    let pointer = self.layout.pointer_to_canvas(mouse.column, mouse.row);
                    self.tracker.begin_drag(pointer);
                    debug!(x = pointer.x, y = pointer.y, "overlay drag started");
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.tracker.is_dragging() {
                    let pointer = self.layout.pointer_to_canvas(mouse.column, mouse.row);
                    self.tracker.update_drag(pointer);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.finish_drag(),
            _ => {}
        }
    }

    /// Ends an in-progress drag and saves where the overlay landed.
    fn finish_drag(&mut self) {
        let store = &self.store;
        self.tracker.end_drag(|position| {
            debug!(x = position.x, y = position.y, "overlay drag finished");
            if let Err(e) = store.save(position) {
                warn!("Failed to save overlay position: {}", e);
            }
        });
    }

    pub fn shutdown(&mut self) {
        self.finish_drag();
        self.scheduler.cancel_all();
        info!("Shutting down");
    }

    fn send_notification(&self, title: &str, body: &str) {
        if let Err(e) = notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("focusclock")
            .show()
        {
            warn!("Failed to send notification: {}", e);
        }
    }

    fn mark_animating(&mut self) {
        self.animating_until = Some(Instant::now() + ANIMATION_TAIL);
    }

    pub fn trigger_mode_change_effect(&mut self, area: Rect) {
        let effect = fx::slide_in(Motion::LeftToRight, 8, 4, self.config.theme.selection, 300)
            .with_area(area);
        self.effect_manager.add_effect(effect);
        self.mark_animating();
    }

    pub fn trigger_reset_effect(&mut self, area: Rect) {
        let effect = fx::dissolve(250).with_area(area);
        self.effect_manager.add_effect(effect);
        self.mark_animating();
    }

    pub fn trigger_complete_effect(&mut self, area: Rect) {
        self.effect_manager
            .add_effect(fx::fade_to_fg(self.config.theme.green, 800).with_area(area));
        self.mark_animating();
    }
}

fn preset_for_digit(c: char) -> Option<Preset> {
    c.to_digit(10)
        .and_then(|digit| Preset::from_index(digit as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::FilePositionStore;
    use crossterm::event::KeyModifiers;
    use focusclock_core::{MemoryPositionStore, OverlayPosition};
    use tempfile::tempdir;

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.timer.notify = false;
        config.location.enabled = false;
        config
    }

    fn app() -> App {
        App::new(quiet_config(), Box::new(MemoryPositionStore::new()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn layout() -> UiLayout {
        UiLayout {
            display: Rect::new(0, 10, 80, 9),
            canvas_origin: (5, 12),
            overlay: Some(Rect::new(5, 10, 2, 1)),
        }
    }

    #[tokio::test]
    async fn keys_drive_the_engine() {
        let mut app = app();
        assert_eq!(app.engine.mode(), Mode::Clock);
        assert!(app.scheduler.sampler_armed());

        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.engine.mode(), Mode::Timer);
        assert_eq!(app.display_text(), "00:25:00");
        assert!(app.scheduler.sampler_armed());

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.engine.is_running());
        assert!(app.scheduler.ticker_armed());
        assert!(!app.scheduler.sampler_armed());

        app.handle_key(key(KeyCode::Char('r')));
        assert!(!app.engine.is_running());
        assert!(!app.scheduler.ticker_armed());

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn presets_only_while_timer_paused() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.engine.configured_duration_secs(), 25 * 60);

        app.toggle_mode();
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.engine.value_secs(), 300);

        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.mode, InputMode::SelectingPreset);
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.engine.value_secs(), 3600);

        app.toggle_running();
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.engine.configured_duration_secs(), 3600);
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn custom_form_sets_duration() {
        let mut app = app();
        app.toggle_mode();
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.mode, InputMode::EditingDuration);
        for code in [
            KeyCode::Backspace,
            KeyCode::Backspace,
            KeyCode::Char('2'),
            KeyCode::Tab,
            KeyCode::Backspace,
            KeyCode::Backspace,
            KeyCode::Char('3'),
            KeyCode::Char('0'),
            KeyCode::Enter,
        ] {
            app.handle_key(key(code));
        }
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.engine.configured_duration_secs(), 9000);
        assert_eq!(app.display_text(), "02:30:00");
    }

    #[tokio::test]
    async fn ticks_pulse_and_complete() {
        let mut app = app();
        app.toggle_mode();
        app.engine.set_duration(2).unwrap();
        app.toggle_running();
        assert_eq!(app.overlay_tone(), OverlayTone::Idle);

        app.on_wake(Wake::Tick);
        assert!(app.pulse_visible);
        assert_eq!(app.overlay_tone(), OverlayTone::Gain);
        assert_eq!(app.overlay_text(), "+$");
        app.on_wake(Wake::PulseElapsed);
        assert!(!app.pulse_visible);

        app.on_wake(Wake::Tick);
        assert!(app.completion_visible);
        assert!(!app.pulse_visible);
        assert_eq!(app.display_text(), "00:00:00");

        app.on_wake(Wake::Tick);
        assert!(app.completion_visible);
        app.on_wake(Wake::CompletionElapsed);
        assert!(!app.completion_visible);
        assert!(app.engine.is_running());
    }

    #[tokio::test]
    async fn paused_timer_flashes_loss() {
        let mut app = app();
        app.toggle_mode();
        assert_eq!(app.overlay_tone(), OverlayTone::Idle);
        assert_eq!(app.overlay_text(), "$");

        app.on_wake(Wake::Sample);
        assert!(app.pulse_visible);
        assert_eq!(app.overlay_tone(), OverlayTone::Loss);
        assert_eq!(app.overlay_text(), "-$");

        app.on_wake(Wake::PulseElapsed);
        assert_eq!(app.overlay_tone(), OverlayTone::Idle);

        app.on_wake(Wake::Sample);
        app.toggle_running();
        assert!(!app.pulse_visible);
        assert_eq!(app.overlay_tone(), OverlayTone::Idle);
    }

    #[tokio::test]
    async fn paused_timer_at_zero_stays_idle() {
        let mut app = app();
        app.toggle_mode();
        app.engine.set_duration(0).unwrap();
        app.on_wake(Wake::Sample);
        assert!(!app.pulse_visible);
        assert_eq!(app.overlay_tone(), OverlayTone::Idle);
    }

    #[tokio::test]
    async fn mode_switch_hides_completion_banner() {
        let mut app = app();
        app.toggle_mode();
        app.engine.set_duration(1).unwrap();
        app.toggle_running();
        app.on_wake(Wake::Tick);
        assert!(app.completion_visible);
        app.toggle_mode();
        assert!(!app.completion_visible);
        assert_eq!(app.engine.mode(), Mode::Stopwatch);
    }

    #[tokio::test]
    async fn drag_persists_on_release_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay_position.json");
        let mut app = App::new(quiet_config(), Box::new(FilePositionStore::with_path(&path)));
        app.toggle_mode();
        app.layout = layout();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 10));
        assert!(app.tracker.is_dragging());
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 15, 12));
        assert!(!path.exists());
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 200, 0));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 200, 0));
        assert!(!app.tracker.is_dragging());

        let expected = OverlayPosition::new(750.0, -200.0);
        assert_eq!(app.tracker.position(), expected);
        let saved = FilePositionStore::with_path(&path).load().unwrap();
        assert_eq!(saved, Some(expected));

        let reopened = App::new(quiet_config(), Box::new(FilePositionStore::with_path(&path)));
        assert_eq!(reopened.tracker.position(), expected);
    }

    #[tokio::test]
    async fn clicks_off_the_overlay_do_not_drag() {
        let mut app = app();
        app.toggle_mode();
        app.layout = layout();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, 15));
        assert!(!app.tracker.is_dragging());

        app.toggle_mode();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 10));
        assert!(!app.tracker.is_dragging());
    }

    #[tokio::test]
    async fn timezone_override_wins() {
        let mut config = quiet_config();
        config.clock.timezone = Some("Asia/Tokyo".to_string());
        let mut app = App::new(config, Box::new(MemoryPositionStore::new()));
        let mut location = LocationData::fallback();
        location.timezone = Some(chrono_tz::Europe::Paris);
        app.set_location(location);
        assert_eq!(app.timezone(), Some(chrono_tz::Asia::Tokyo));

        app.timezone_override = None;
        assert_eq!(app.timezone(), Some(chrono_tz::Europe::Paris));
    }

    #[tokio::test]
    async fn shutdown_cancels_timers() {
        let mut app = app();
        app.toggle_mode();
        app.toggle_running();
        app.shutdown();
        assert!(!app.scheduler.ticker_armed());
        assert!(!app.scheduler.sampler_armed());
    }
}
