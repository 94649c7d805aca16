use serde::{Deserialize, Serialize};

/// Which of the three displays is active
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Clock,
    Timer,
    Stopwatch,
}

impl Mode {
    /// Next mode in the Clock -> Timer -> Stopwatch cycle
    pub fn next(self) -> Self {
        match self {
            Mode::Clock => Mode::Timer,
            Mode::Timer => Mode::Stopwatch,
            Mode::Stopwatch => Mode::Clock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Clock => "Current Time",
            Mode::Timer => "Focus Timer",
            Mode::Stopwatch => "Stopwatch",
        }
    }

    /// Clock mode samples wall time instead of keeping a counter.
    pub fn has_counter(self) -> bool {
        !matches!(self, Mode::Clock)
    }
}
