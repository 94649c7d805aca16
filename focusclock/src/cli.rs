//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "focusclock")]
#[command(about = "Clock, focus timer and stopwatch for the terminal", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// IANA timezone for the clock, e.g. Europe/Paris
    #[arg(short, long)]
    pub timezone: Option<String>,

    /// Initial focus timer length in minutes
    #[arg(short, long)]
    pub minutes: Option<u64>,

    /// Skip the geolocation lookup
    #[arg(long)]
    pub offline: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Lets flags win over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(tz) = &self.timezone {
            config.clock.timezone = Some(tz.clone());
        }
        if let Some(minutes) = self.minutes {
            config.timer.default_minutes = minutes;
        }
        if self.offline {
            config.location.enabled = false;
        }
    }
}
