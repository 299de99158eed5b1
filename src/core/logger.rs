//! Main logger implementation

use super::{
    children::ChildRegistry,
    config::LoggerConfig,
    error::Result,
    formatter,
    handler::{Handler, HandlerChain},
    log_level::LogLevel,
    log_record::{LogRecord, RecordContext},
    metrics::LoggerMetrics,
    pool::{RecordPool, DEFAULT_POOL_CAPACITY},
};
use crate::adapters::{self, LeveledLogger, LineWriter};
use crate::sink::{CancelHandle, Hijacker, ScanRenderer, Sink, WriteContext};
use parking_lot::Mutex;
use std::fmt;
use std::io::{Read, Write};
use std::sync::{Arc, OnceLock};

/// Everything guarded by the logger's configuration lock.
#[derive(Clone)]
struct LoggerState {
    prefix: Arc<[u8]>,
    level: LogLevel,
    time_format: Arc<str>,
    handlers: HandlerChain,
}

impl LoggerState {
    fn from_config(config: &LoggerConfig) -> Self {
        Self {
            prefix: Arc::from(config.prefix.as_bytes()),
            level: config.level,
            time_format: Arc::from(config.time_format.as_str()),
            handlers: HandlerChain::new(),
        }
    }
}

/// A leveled logger.
///
/// Every call goes through: level check, record acquisition, handler chain,
/// default rendering and sink write, record release. All methods take `&self`
/// and are safe to call from many threads at once.
///
/// `Clone` derives an independent logger: it copies the prefix, level, time
/// format and a snapshot of the handler chain, shares the sink, and gets its
/// own lock, record pool, metrics and children.
pub struct Logger {
    state: Arc<Mutex<LoggerState>>,
    sink: Arc<Sink>,
    pool: RecordPool,
    scan_renderer: OnceLock<ScanRenderer>,
    children: ChildRegistry,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger at `Info` writing to stdout with the default time format.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(Sink::stdout()))
    }

    #[must_use]
    pub fn with_sink(sink: Arc<Sink>) -> Self {
        Self::from_parts(&LoggerConfig::default(), sink, DEFAULT_POOL_CAPACITY)
    }

    /// Build a logger from a validated configuration.
    pub fn from_config(config: &LoggerConfig, sink: Arc<Sink>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, sink, DEFAULT_POOL_CAPACITY))
    }

    fn from_parts(config: &LoggerConfig, sink: Arc<Sink>, pool_capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LoggerState::from_config(config))),
            sink,
            pool: RecordPool::with_capacity(pool_capacity),
            scan_renderer: OnceLock::new(),
            children: ChildRegistry::new(),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Set the raw prefix written before every line. No separator is added.
    pub fn set_prefix(&self, prefix: impl AsRef<[u8]>) -> &Self {
        self.state.lock().prefix = Arc::from(prefix.as_ref());
        self
    }

    pub fn prefix(&self) -> Arc<[u8]> {
        Arc::clone(&self.state.lock().prefix)
    }

    /// Set the strftime-style time format; an empty string disables timestamps.
    pub fn set_time_format(&self, time_format: &str) -> &Self {
        self.state.lock().time_format = Arc::from(time_format);
        self
    }

    pub fn time_format(&self) -> String {
        self.state.lock().time_format.to_string()
    }

    /// Set the threshold by name; unknown names select `info`.
    pub fn set_level(&self, name: &str) -> &Self {
        self.set_min_level(LogLevel::from_name(name))
    }

    pub fn set_min_level(&self, level: LogLevel) -> &Self {
        self.state.lock().level = level;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.state.lock().level
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoggerConfig {
        let state = self.state.lock();
        LoggerConfig {
            level: state.level,
            prefix: String::from_utf8_lossy(&state.prefix).into_owned(),
            time_format: state.time_format.to_string(),
        }
    }

    /// Replace level, prefix and time format in one step.
    pub fn apply_config(&self, config: &LoggerConfig) -> Result<()> {
        config.validate()?;
        let mut state = self.state.lock();
        state.level = config.level;
        state.prefix = Arc::from(config.prefix.as_bytes());
        state.time_format = Arc::from(config.time_format.as_str());
        Ok(())
    }

    /// Append a handler to the chain.
    ///
    /// Handlers run in registration order for every record that passes the
    /// level check. The first one returning `true` consumes the record and
    /// suppresses the default output.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatch::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let logger = Logger::with_sink(Arc::new(Sink::discard()));
    /// logger.handle(|record: &LogRecord| record.level() == LogLevel::Error);
    /// logger.error("routed elsewhere");
    /// assert_eq!(logger.metrics().handled(), 1);
    /// ```
    pub fn handle<F>(&self, handler: F)
    where
        F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
    {
        self.register_handler(Arc::new(handler));
    }

    pub fn register_handler(&self, handler: Handler) {
        self.state.lock().handlers.register(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.state.lock().handlers.len()
    }

    /// Route every record to an external leveled logger instead of the sink.
    ///
    /// Install at most once per logger. The installed handler consumes every
    /// record, so handlers registered after it never run.
    pub fn install(&self, logger: impl LeveledLogger + 'static) {
        self.register_handler(adapters::leveled_handler(logger));
    }

    /// Route every record to a plain line writer instead of the sink.
    pub fn install_std(&self, writer: impl LineWriter + 'static) {
        self.register_handler(adapters::line_writer_handler(writer));
    }

    pub fn add_output(&self, output: impl Write + Send + 'static) {
        self.sink.add_output(output);
    }

    pub fn set_output(&self, output: impl Write + Send + 'static) {
        self.sink.set_output(output);
    }

    pub fn hijack<F>(&self, hijacker: F)
    where
        F: Fn(&mut WriteContext<'_>) + Send + Sync + 'static,
    {
        let hijacker: Hijacker = Arc::new(hijacker);
        self.sink.hijack(hijacker);
    }

    /// Print every line read from `reader` as a level-less, time-stamped line
    /// until end of stream or until the returned handle is cancelled.
    pub fn scan<R>(&self, reader: R) -> Result<CancelHandle>
    where
        R: Read + Send + 'static,
    {
        let render = self
            .scan_renderer
            .get_or_init(|| {
                let state = Arc::clone(&self.state);
                let render: ScanRenderer = Arc::new(move |line: &str, out: &mut Vec<u8>| {
                    let (prefix, time_format) = {
                        let state = state.lock();
                        (Arc::clone(&state.prefix), Arc::clone(&state.time_format))
                    };
                    formatter::format_scanned(&prefix, &time_format, line, out);
                });
                render
            })
            .clone();

        self.sink.scan_into(reader, true, render)
    }

    /// Child logger for `name`, created on first use.
    ///
    /// The child starts as a clone of this logger with prefix `"<name>: "`
    /// (or `name` unchanged when it already ends in whitespace).
    pub fn child(&self, name: &str) -> Arc<Logger> {
        self.children.get_or_create(name, self)
    }

    pub fn child_names(&self) -> Vec<String> {
        self.children.names()
    }

    pub fn sink(&self) -> &Arc<Sink> {
        &self.sink
    }

    pub fn pool(&self) -> &RecordPool {
        &self.pool
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn dispatch(&self, level: LogLevel, args: fmt::Arguments<'_>, newline: bool) {
        let (context, handlers) = {
            let state = self.state.lock();
            if !state.level.allows(level) {
                drop(state);
                self.metrics.record_filtered();
                return;
            }
            let context = RecordContext {
                prefix: Arc::clone(&state.prefix),
                time_format: Arc::clone(&state.time_format),
            };
            (context, state.handlers.clone())
        };

        let mut record = self.pool.acquire(level, args, newline, context);

        let (handled, panics) = handlers.dispatch_counting_panics(&record);
        if panics > 0 {
            self.metrics.record_handler_panics(panics);
        }
        if handled {
            self.metrics.record_handled();
            return;
        }

        let line = record.render(self.sink.supports_colors());
        let result = if newline {
            self.sink.write_line(line)
        } else {
            self.sink.write(line)
        };

        match result {
            Ok(()) => {
                self.metrics.record_emitted();
            }
            Err(e) => {
                self.metrics.record_write_failure();
                eprintln!("[LOGGER ERROR] Sink write failed: {}", e);
            }
        }
    }

    /// Level-less message without a trailing newline
    pub fn print(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Disable, format_args!("{}", message), false);
    }

    /// Level-less message followed by a newline
    pub fn println(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Disable, format_args!("{}", message), true);
    }

    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        self.dispatch(level, format_args!("{}", message), true);
    }

    /// Leveled message from pre-built format arguments; used by the macros.
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.dispatch(level, args, true);
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        let state = self.state.lock().clone();
        Self {
            state: Arc::new(Mutex::new(state)),
            sink: Arc::clone(&self.sink),
            pool: RecordPool::with_capacity(self.pool.capacity()),
            scan_renderer: OnceLock::new(),
            children: ChildRegistry::new(),
            metrics: LoggerMetrics::new(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Logger")
            .field("prefix", &String::from_utf8_lossy(&state.prefix))
            .field("level", &state.level)
            .field("time_format", &state.time_format)
            .field("handlers", &state.handlers)
            .field("sink", &self.sink)
            .field("pool", &self.pool)
            .field("children", &self.children)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_log_dispatch::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .prefix("api: ")
///     .time_format("")
///     .output(std::io::sink())
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.level(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Arc<Sink>>,
    outputs: Vec<Box<dyn Write + Send>>,
    handlers: Vec<Handler>,
    pool_capacity: usize,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
            outputs: Vec::new(),
            handlers: Vec::new(),
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, time_format: impl Into<String>) -> Self {
        self.config.time_format = time_format.into();
        self
    }

    /// Use an existing, possibly shared, sink.
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Add a destination. Without any output or sink the logger writes to
    /// stdout.
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: impl Write + Send + 'static) -> Self {
        self.outputs.push(Box::new(output));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Build the Logger, validating the time format.
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;

        let mut outputs = self.outputs.into_iter();
        let sink = match self.sink {
            Some(sink) => sink,
            None => match outputs.next() {
                Some(first) => Arc::new(Sink::new(first)),
                None => Arc::new(Sink::stdout()),
            },
        };
        for output in outputs {
            sink.add_output(output);
        }

        let logger = Logger::from_parts(&self.config, sink, self.pool_capacity);
        for handler in self.handlers {
            logger.register_handler(handler);
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
