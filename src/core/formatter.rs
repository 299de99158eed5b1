//! Default line rendering
//!
//! A line is `<prefix><tag> <timestamp> <message>` where the tag is dropped
//! for level-less records and the timestamp is dropped when the time format
//! is empty. Fields are joined by single spaces only when both sides are
//! non-empty. The prefix is copied verbatim, so separators such as `": "`
//! belong to the prefix itself.

use super::log_level::LogLevel;
use super::log_record::LogRecord;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Default time format, `2024/05/17 14:03` style.
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Render `time` with a strftime-style `format`.
///
/// An empty format disables timestamps. A format chrono cannot render also
/// yields an empty string rather than panicking inside the print path.
pub fn format_timestamp(time: &DateTime<Local>, format: &str) -> String {
    if format.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_err() {
        out.clear();
    }
    out
}

/// Append the default line for `record` to `out`.
pub fn format_record(record: &LogRecord, colors: bool, out: &mut Vec<u8>) {
    let tag = record.level().text(colors);
    let timestamp = record.format_time();
    write_fields(
        out,
        record.prefix(),
        &[tag.as_ref(), timestamp.as_str(), record.message()],
    );
}

/// Append a level-less, time-stamped line as produced by scanning a stream.
pub(crate) fn format_scanned(
    prefix: &[u8],
    time_format: &str,
    message: &str,
    out: &mut Vec<u8>,
) {
    let timestamp = format_timestamp(&Local::now(), time_format);
    let tag = LogLevel::Disable.tag();
    write_fields(out, prefix, &[tag, timestamp.as_str(), message]);
}

fn write_fields(out: &mut Vec<u8>, prefix: &[u8], fields: &[&str]) {
    out.extend_from_slice(prefix);

    let mut first = true;
    for field in fields.iter().filter(|field| !field.is_empty()) {
        if !first {
            out.push(b' ');
        }
        out.extend_from_slice(field.as_bytes());
        first = false;
    }
}
