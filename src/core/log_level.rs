//! Log level definitions

use super::error::LoggerError;
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Severity tiers, ordered `Disable < Error < Warn < Info < Debug`.
///
/// A logger configured with threshold `T` emits a leveled message at `L` only
/// when `T >= L`. `Disable` is the level-less tier used by `print`/`println`:
/// those calls are emitted regardless of the threshold, while a threshold of
/// `Disable` silences every leveled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum LogLevel {
    Disable = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Disable,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Map a level name to its tier, falling back to `Info` for unknown names.
    ///
    /// Matching is case-insensitive over `disable`, `error`, `warn`, `info` and
    /// `debug`.
    ///
    /// ```
    /// use rust_log_dispatch::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_name("DEBUG"), LogLevel::Debug);
    /// assert_eq!(LogLevel::from_name("verbose"), LogLevel::Info);
    /// ```
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(LogLevel::Info)
    }

    /// Lowercase configuration name
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Disable => "disable",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Four-letter tag rendered in front of a message, empty for `Disable`
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Disable => "",
            LogLevel::Error => "ERRO",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DBUG",
        }
    }

    pub fn color_code(&self) -> Option<Color> {
        match self {
            LogLevel::Disable => None,
            LogLevel::Error => Some(Color::Red),
            LogLevel::Warn => Some(Color::Magenta),
            LogLevel::Info => Some(Color::Cyan),
            LogLevel::Debug => Some(Color::Yellow),
        }
    }

    /// Tag text for this level, styled when the destination supports colors.
    pub fn text(&self, colors: bool) -> Cow<'static, str> {
        match self.color_code() {
            Some(color) if colors => Cow::Owned(self.tag().color(color).to_string()),
            _ => Cow::Borrowed(self.tag()),
        }
    }

    /// Whether a message at `level` passes a threshold of `self`.
    #[inline]
    pub fn allows(&self, level: LogLevel) -> bool {
        level == LogLevel::Disable || *self >= level
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disable" => Ok(LogLevel::Disable),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<String> for LogLevel {
    fn from(name: String) -> Self {
        LogLevel::from_name(&name)
    }
}

impl From<LogLevel> for &'static str {
    fn from(level: LogLevel) -> Self {
        level.name()
    }
}
