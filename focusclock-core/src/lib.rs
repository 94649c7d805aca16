//! Time-keeping core shared by the focusclock shell
//!
//! The engine owns the clock/timer/stopwatch state machine, the tracker
//! owns the draggable overlay's position, and the formatter turns both into
//! something a shell can print. Nothing in here performs I/O or spawns
//! timers; the shell drives everything.

pub mod duration;
pub mod engine;
pub mod format;
pub mod location;
pub mod mode;
pub mod position;
pub mod store;

pub use duration::{CustomDuration, Field, Preset};
pub use engine::{step, EngineError, Step, TickOutcome, TimeModeEngine, TimerState};
pub use format::{format_display, format_hms};
pub use location::{currency_symbol, Currency, IpApiResponse, LocationData};
pub use mode::Mode;
pub use position::{Bounds, OverlayPosition, PositionTracker, OVERLAY_BOUNDS};
pub use store::{restore_position, MemoryPositionStore, PositionStore, StoreError};

/// Duration the timer starts with when nothing else is configured
pub const DEFAULT_TIMER_MINUTES: u64 = 25;
