use anyhow::{Context, Result};
use directories::ProjectDirs;
use focusclock_core::DEFAULT_TIMER_MINUTES;
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCATION_ENDPOINT: &str = "https://ipapi.co/json/";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub icons: Icons,
    pub timer: TimerConfig,
    pub clock: ClockConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub selection: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub black: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub red: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub green: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub yellow: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub blue: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub magenta: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub gray: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub clock: String,
    pub timer: String,
    pub stopwatch: String,
    pub play: String,
    pub pause: String,
    pub location: String,
    pub input_cursor: String,
    pub separator: String,
    pub header_left: String,
    pub header_right: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimerConfig {
    pub default_minutes: u64,
    /// Desktop notification when the countdown reaches zero.
    pub notify: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ClockConfig {
    /// IANA zone name that wins over the detected one.
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LocationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0, 0, 0),
            foreground: Color::Rgb(96, 165, 250),
            selection: Color::Rgb(147, 197, 253),
            black: Color::Rgb(15, 23, 42),
            red: Color::Rgb(239, 68, 68),
            green: Color::Rgb(16, 185, 129),
            yellow: Color::Rgb(196, 178, 138),
            blue: Color::Rgb(59, 130, 246),
            magenta: Color::Rgb(162, 146, 163),
            gray: Color::Rgb(100, 116, 139),
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            clock: "◷".to_string(),
            timer: "⧗".to_string(),
            stopwatch: "⏱".to_string(),
            play: "▶".to_string(),
            pause: "⏸".to_string(),
            location: "⌖".to_string(),
            input_cursor: "▊".to_string(),
            separator: "│".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_TIMER_MINUTES,
            notify: true,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_LOCATION_ENDPOINT.to_string(),
            timeout_secs: 5,
        }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 || !s[1..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "focusclock", "focusclock")
        .map(|proj_dirs| proj_dirs.config_dir().join("focusclock.toml"))
}

/// Loads `path`, or the platform config file when `path` is `None`.
/// A missing file means defaults; a malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => return Ok(Config::default()),
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file at {:?}", path))
}
