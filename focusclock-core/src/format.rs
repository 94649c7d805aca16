//! Display text for the three modes

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::mode::Mode;

/// Text for the main display.
///
/// Clock mode shows `now` as 24-hour `HH:MM:SS` in `timezone`, or in the
/// local zone when none is known. The other modes show `value_secs`.
pub fn format_display(
    mode: Mode,
    value_secs: u64,
    now: DateTime<Utc>,
    timezone: Option<&Tz>,
) -> String {
    match mode {
        Mode::Clock => match timezone {
            Some(tz) => now.with_timezone(tz).format("%H:%M:%S").to_string(),
            None => now.with_timezone(&Local).format("%H:%M:%S").to_string(),
        },
        Mode::Timer | Mode::Stopwatch => format_hms(value_secs),
    }
}

/// `HH:MM:SS`, each part at least two digits wide.
pub fn format_hms(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
