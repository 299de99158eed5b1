//! Logging macros for ergonomic log message formatting.
//!
//! These macros take the logger as their first argument and format lazily:
//! the arguments are only rendered when the level passes the threshold.
//!
//! # Examples
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//! use rust_log_dispatch::info;
//! use std::sync::Arc;
//!
//! let logger = Logger::with_sink(Arc::new(Sink::discard()));
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_sink(std::sync::Arc::new(Sink::discard()));
/// use rust_log_dispatch::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_sink(std::sync::Arc::new(Sink::discard()));
/// use rust_log_dispatch::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = Logger::with_sink(std::sync::Arc::new(Sink::discard()));
/// use rust_log_dispatch::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, LogRecord, Logger};
    use crate::sink::Sink;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_logger() -> (Logger, Arc<Mutex<Vec<(LogLevel, String)>>>) {
        let logger = Logger::with_sink(Arc::new(Sink::discard()));
        logger.set_min_level(LogLevel::Debug);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&seen);
        logger.handle(move |record: &LogRecord| {
            store
                .lock()
                .push((record.level(), record.message().to_string()));
            true
        });
        (logger, seen)
    }

    #[test]
    fn test_log_macro() {
        let (logger, seen) = recording_logger();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Warn, "Formatted: {}", 42);

        let seen = seen.lock();
        assert_eq!(seen[0], (LogLevel::Info, "Test message".to_string()));
        assert_eq!(seen[1], (LogLevel::Warn, "Formatted: 42".to_string()));
    }

    #[test]
    fn test_level_macros() {
        let (logger, seen) = recording_logger();
        error!(logger, "e{}", 1);
        warn!(logger, "w{}", 2);
        info!(logger, "i{}", 3);
        debug!(logger, "d{}", 4);

        let levels: Vec<LogLevel> = seen.lock().iter().map(|(level, _)| *level).collect();
        assert_eq!(
            levels,
            vec![LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug]
        );
        assert_eq!(seen.lock()[3].1, "d4");
    }

    #[test]
    fn test_macro_through_arc_logger() {
        let (logger, seen) = recording_logger();
        let child = logger.child("api");
        info!(child, "from child");
        assert_eq!(seen.lock()[0].1, "from child");
    }
}
