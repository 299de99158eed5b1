//! Serializable logger configuration

use super::error::{LoggerError, Result};
use super::formatter::DEFAULT_TIME_FORMAT;
use super::log_level::LogLevel;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// The mutable configuration surface of a logger.
///
/// Unknown level names deserialize to `info`. Missing fields take their
/// defaults.
///
/// # Examples
///
/// ```
/// use rust_log_dispatch::{LoggerConfig, LogLevel};
///
/// let config = LoggerConfig::from_json(r#"{"level": "debug", "prefix": "api: "}"#).unwrap();
/// assert_eq!(config.level, LogLevel::Debug);
/// assert_eq!(config.time_format, "%Y/%m/%d %H:%M");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub prefix: String,
    /// strftime-style format, empty to disable timestamps
    pub time_format: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            prefix: String::new(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject time formats that chrono cannot render.
    pub fn validate(&self) -> Result<()> {
        let invalid = StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("unsupported time format '{}'", self.time_format),
            ));
        }
        Ok(())
    }
}
