//! Process-wide default logger
//!
//! The default logger is created on first use: `Info` level, no prefix, the
//! default time format, writing to stdout. The free functions below forward to
//! it.

use crate::adapters::{LeveledLogger, LineWriter};
use crate::core::{LogRecord, Logger, Result};
use crate::sink::{CancelHandle, WriteContext};
use std::fmt;
use std::io::{Read, Write};
use std::sync::{Arc, OnceLock};

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(Logger::new)
}

pub fn set_level(name: &str) {
    default_logger().set_level(name);
}

pub fn set_prefix(prefix: impl AsRef<[u8]>) {
    default_logger().set_prefix(prefix);
}

pub fn set_time_format(time_format: &str) {
    default_logger().set_time_format(time_format);
}

pub fn print(message: impl fmt::Display) {
    default_logger().print(message);
}

pub fn println(message: impl fmt::Display) {
    default_logger().println(message);
}

pub fn error(message: impl fmt::Display) {
    default_logger().error(message);
}

pub fn warn(message: impl fmt::Display) {
    default_logger().warn(message);
}

pub fn info(message: impl fmt::Display) {
    default_logger().info(message);
}

pub fn debug(message: impl fmt::Display) {
    default_logger().debug(message);
}

pub fn handle<F>(handler: F)
where
    F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
{
    default_logger().handle(handler);
}

pub fn install(logger: impl LeveledLogger + 'static) {
    default_logger().install(logger);
}

pub fn install_std(writer: impl LineWriter + 'static) {
    default_logger().install_std(writer);
}

pub fn add_output(output: impl Write + Send + 'static) {
    default_logger().add_output(output);
}

pub fn set_output(output: impl Write + Send + 'static) {
    default_logger().set_output(output);
}

pub fn hijack<F>(hijacker: F)
where
    F: Fn(&mut WriteContext<'_>) + Send + Sync + 'static,
{
    default_logger().hijack(hijacker);
}

pub fn scan<R>(reader: R) -> Result<CancelHandle>
where
    R: Read + Send + 'static,
{
    default_logger().scan(reader)
}

pub fn child(name: &str) -> Arc<Logger> {
    default_logger().child(name)
}
