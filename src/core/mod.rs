//! Core logger types

pub mod children;
pub mod config;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod pool;

pub use children::{child_prefix, ChildRegistry};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use formatter::{format_record, format_timestamp, DEFAULT_TIME_FORMAT};
pub use handler::{Handler, HandlerChain};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use pool::{RecordPool, DEFAULT_POOL_CAPACITY};
