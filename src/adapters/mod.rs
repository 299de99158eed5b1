//! Adapters that hand records to other loggers
//!
//! Each adapter turns an outside logger into a [`Handler`] that consumes every
//! record it receives, replacing the default sink output.

use crate::core::{Handler, LogLevel, LogRecord};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A plain line writer, in the spirit of a standard library logger.
pub trait LineWriter: Send + Sync {
    fn print(&self, message: &str);
    fn println(&self, message: &str);
}

/// An external logger exposing one method per severity.
pub trait LeveledLogger: Send + Sync {
    fn print(&self, message: &str);
    fn println(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Any writer behind a mutex is a line writer. Write errors are reported on
/// stderr.
impl<W: Write + Send> LineWriter for Mutex<W> {
    fn print(&self, message: &str) {
        if let Err(e) = self.lock().write_all(message.as_bytes()) {
            eprintln!("[LOGGER ERROR] Line writer failed: {}", e);
        }
    }

    fn println(&self, message: &str) {
        let mut writer = self.lock();
        let result = writer
            .write_all(message.as_bytes())
            .and_then(|_| writer.write_all(b"\n"));
        if let Err(e) = result {
            eprintln!("[LOGGER ERROR] Line writer failed: {}", e);
        }
    }
}

impl<T: LineWriter + ?Sized> LineWriter for Arc<T> {
    fn print(&self, message: &str) {
        (**self).print(message);
    }

    fn println(&self, message: &str) {
        (**self).println(message);
    }
}

impl<T: LeveledLogger + ?Sized> LeveledLogger for Arc<T> {
    fn print(&self, message: &str) {
        (**self).print(message);
    }

    fn println(&self, message: &str) {
        (**self).println(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }

    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn debug(&self, message: &str) {
        (**self).debug(message);
    }
}

/// Handler forwarding each message to `writer`, keeping the newline choice.
pub fn line_writer_handler(writer: impl LineWriter + 'static) -> Handler {
    Arc::new(move |record: &LogRecord| {
        if record.is_newline() {
            writer.println(record.message());
        } else {
            writer.print(record.message());
        }
        true
    })
}

/// Handler forwarding each message to the method matching its level.
/// Level-less records go to `print`/`println`.
pub fn leveled_handler(logger: impl LeveledLogger + 'static) -> Handler {
    Arc::new(move |record: &LogRecord| {
        let message = record.message();
        match record.level() {
            LogLevel::Error => logger.error(message),
            LogLevel::Warn => logger.warn(message),
            LogLevel::Info => logger.info(message),
            LogLevel::Debug => logger.debug(message),
            LogLevel::Disable if record.is_newline() => logger.println(message),
            LogLevel::Disable => logger.print(message),
        }
        true
    })
}
