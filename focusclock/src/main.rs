use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use focusclock_core::{LocationData, MemoryPositionStore, PositionStore};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::OpenOptions;
use std::future::pending;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod location;
mod persistence;
mod scheduler;
mod ui;

use app::App;
use cli::Cli;
use persistence::{data_dir, FilePositionStore};
use scheduler::Wake;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

enum LoopEvent {
    Terminal(Option<io::Result<Event>>),
    Wake(Wake),
    Located(LocationData),
    Frame,
}

fn init_logging(level: &str) -> Result<()> {
    let log_path = data_dir()?.join("focusclock.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("focusclock={level},focusclock_core={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn position_store() -> Box<dyn PositionStore> {
    match FilePositionStore::new() {
        Ok(store) => {
            info!("Overlay position file: {:?}", store.path());
            Box::new(store)
        }
        Err(e) => {
            warn!("Overlay position will not persist: {:#}", e);
            Box::new(MemoryPositionStore::new())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply(&mut config);

    // Logs go to a file; the terminal belongs to the UI.
    if let Err(e) = init_logging(cli.log_level()) {
        eprintln!("Logging disabled: {:#}", e);
    }
    info!("Starting focusclock");

    let location_config = config.location.clone();
    let mut app = App::new(config, position_store());
    let mut locating = Some(tokio::spawn(async move {
        location::lookup(&location_config).await
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut terminal = or_restore(setup_terminal, restore_terminal)?;

    let res = run_app(&mut terminal, &mut app, &mut locating).await;

    app.shutdown();
    if let Some(task) = locating.take() {
        task.abort();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Exited with error: {:#}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Best-effort undo of a half-finished setup.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Runs `setup`; if it fails, runs `restore` before handing back the error.
fn or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().map_err(|e| {
        restore();
        e
    })
}

/// Resolves once the location lookup finishes; pends forever after that.
async fn located(task: &mut Option<JoinHandle<LocationData>>) -> LocationData {
    let Some(handle) = task.as_mut() else {
        return pending().await;
    };
    let result = handle.await;
    *task = None;
    result.unwrap_or_else(|e| {
        warn!("Location task failed: {}", e);
        LocationData::fallback()
    })
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    locating: &mut Option<JoinHandle<LocationData>>,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        let mut layout = app.layout;
        terminal.draw(|f| layout = ui::draw(f, app))?;
        app.layout = layout;

        let animating = app.animating();
        let event = tokio::select! {
            event = events.next() => LoopEvent::Terminal(event),
            wake = app.scheduler.next() => LoopEvent::Wake(wake),
            location = located(locating) => LoopEvent::Located(location),
            _ = tokio::time::sleep(FRAME_INTERVAL), if animating => LoopEvent::Frame,
        };

        match event {
            LoopEvent::Terminal(None) => return Ok(()),
            LoopEvent::Terminal(Some(event)) => match event? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            },
            LoopEvent::Wake(wake) => app.on_wake(wake),
            LoopEvent::Located(location) => app.set_location(location),
            LoopEvent::Frame => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
