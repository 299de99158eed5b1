//! Log record structure

use super::formatter;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Configuration of the owning logger captured when a record is acquired.
///
/// Both fields are reference counted so taking the snapshot never copies the
/// prefix or format text.
#[derive(Debug, Clone)]
pub(crate) struct RecordContext {
    pub prefix: Arc<[u8]>,
    pub time_format: Arc<str>,
}

impl Default for RecordContext {
    fn default() -> Self {
        Self {
            prefix: Arc::from(Vec::new()),
            time_format: Arc::from(""),
        }
    }
}

/// One emission attempt.
///
/// Records are pooled by their logger and overwritten on every acquisition.
/// Handlers receive `&LogRecord` for the duration of a single call; copy out
/// whatever needs to outlive it.
#[derive(Debug)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    time: DateTime<Local>,
    newline: bool,
    context: RecordContext,
    line: Vec<u8>,
}

impl LogRecord {
    /// Standalone record with an empty prefix and no time format.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Local::now(),
            newline: true,
            context: RecordContext::default(),
            line: Vec::new(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(LogLevel::Disable, String::new())
    }

    /// Overwrite every field; the message buffer keeps its capacity.
    pub(crate) fn reset(
        &mut self,
        level: LogLevel,
        args: fmt::Arguments<'_>,
        newline: bool,
        context: RecordContext,
    ) {
        self.level = level;
        self.message.clear();
        // Only a misbehaving Display impl can fail here; keep what was written.
        let _ = self.message.write_fmt(args);
        self.time = Local::now();
        self.newline = newline;
        self.context = context;
        self.line.clear();
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        let prefix: Vec<u8> = prefix.into();
        self.context.prefix = Arc::from(prefix);
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, time_format: &str) -> Self {
        self.context.time_format = Arc::from(time_format);
        self
    }

    #[must_use]
    pub fn with_newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    /// True for `println` and leveled calls, false for `print`.
    pub fn is_newline(&self) -> bool {
        self.newline
    }

    /// Raw prefix of the owning logger at acquisition time
    pub fn prefix(&self) -> &[u8] {
        &self.context.prefix
    }

    pub fn time_format(&self) -> &str {
        &self.context.time_format
    }

    /// Creation time rendered with the owning logger's time format, empty when
    /// timestamps are disabled.
    pub fn format_time(&self) -> String {
        formatter::format_timestamp(&self.time, self.time_format())
    }

    /// Render the default line into the record's scratch buffer.
    pub(crate) fn render(&mut self, colors: bool) -> &[u8] {
        let mut line = std::mem::take(&mut self.line);
        line.clear();
        formatter::format_record(self, colors, &mut line);
        self.line = line;
        &self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_overwrites_every_field() {
        let mut record = LogRecord::new(LogLevel::Error, "stale message that is long")
            .with_prefix("old: ")
            .with_time_format("%Y")
            .with_newline(true);

        let context = RecordContext {
            prefix: Arc::from(b"new: ".to_vec()),
            time_format: Arc::from(""),
        };
        record.reset(LogLevel::Debug, format_args!("fresh {}", 1), false, context);

        assert_eq!(record.level(), LogLevel::Debug);
        assert_eq!(record.message(), "fresh 1");
        assert!(!record.is_newline());
        assert_eq!(record.prefix(), b"new: ");
        assert_eq!(record.time_format(), "");
        assert_eq!(record.format_time(), "");
    }

    #[test]
    fn test_reset_keeps_message_capacity() {
        let mut record = LogRecord::new(LogLevel::Info, "x".repeat(128));
        let capacity = record.message.capacity();

        record.reset(LogLevel::Info, format_args!("short"), true, RecordContext::default());

        assert_eq!(record.message(), "short");
        assert!(record.message.capacity() >= capacity);
    }

    #[test]
    fn test_render_reuses_buffer() {
        let mut record = LogRecord::new(LogLevel::Info, "ready").with_prefix("svc: ");
        assert_eq!(record.render(false), b"svc: INFO ready");

        record.reset(LogLevel::Warn, format_args!("slow"), true, RecordContext::default());
        assert_eq!(record.render(false), b"WARN slow");
    }
}
