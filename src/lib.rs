//! # Rust Log Dispatch
//!
//! A small leveled logger with a pluggable handler chain.
//!
//! ## Features
//!
//! - **Levels**: `error`, `warn`, `info`, `debug` plus level-less `print`
//! - **Handlers**: intercept records before they reach the output
//! - **Children**: named sub-loggers sharing the parent's output
//! - **Hijacking and scanning**: rewrite final bytes, or pipe a reader into
//!   the log
//! - **Thread Safe**: every operation takes `&self`; lines never interleave
//!
//! ## Example
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//!
//! let logger = Logger::builder()
//!     .level(LogLevel::Debug)
//!     .time_format("")
//!     .output(std::io::sink())
//!     .build()
//!     .unwrap();
//!
//! let db = logger.child("db");
//! db.info("connected");
//! ```

pub mod adapters;
pub mod core;
pub mod global;
pub mod macros;
pub mod sink;

pub mod prelude {
    pub use crate::adapters::{LeveledLogger, LineWriter};
    pub use crate::core::{
        Handler, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result,
    };
    pub use crate::sink::{CancelHandle, Sink, WriteContext};
}

pub use adapters::{leveled_handler, line_writer_handler, LeveledLogger, LineWriter};
pub use core::{
    child_prefix, format_record, format_timestamp, ChildRegistry, Handler, HandlerChain,
    LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    RecordPool, Result, DEFAULT_POOL_CAPACITY, DEFAULT_TIME_FORMAT,
};
pub use global::default_logger;
pub use sink::{CancelHandle, Hijacker, ScanRenderer, Sink, WriteContext, MAX_SCAN_LINE};
