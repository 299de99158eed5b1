//! Handler chain for intercepting records before default emission

use super::log_record::LogRecord;
use std::fmt;
use std::sync::Arc;

/// Interceptor invoked with every record that passes the level check.
///
/// Returning `true` means the handler fully handled the record and the
/// logger must not write its default line.
pub type Handler = Arc<dyn Fn(&LogRecord) -> bool + Send + Sync>;

/// Ordered, append-only list of handlers.
///
/// The list is stored behind an `Arc<[Handler]>` and replaced on every
/// registration, so cloning a chain is a cheap snapshot: later registrations
/// on one clone are never visible to another.
#[derive(Clone)]
pub struct HandlerChain {
    handlers: Arc<[Handler]>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self {
            handlers: Arc::from(Vec::new()),
        }
    }

    pub fn register(&mut self, handler: Handler) {
        let mut handlers = Vec::with_capacity(self.handlers.len() + 1);
        handlers.extend(self.handlers.iter().cloned());
        handlers.push(handler);
        self.handlers = Arc::from(handlers);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run handlers in registration order until one reports the record as
    /// handled.
    ///
    /// **Panic isolation**: a handler that panics is reported on stderr and
    /// treated as not having handled the record, so the rest of the chain
    /// still runs.
    pub fn dispatch(&self, record: &LogRecord) -> bool {
        self.dispatch_counting_panics(record).0
    }

    /// Same as [`dispatch`](Self::dispatch), also returning how many handlers
    /// panicked.
    pub(crate) fn dispatch_counting_panics(&self, record: &LogRecord) -> (bool, u64) {
        let mut panics = 0;

        for (idx, handler) in self.handlers.iter().enumerate() {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(record)));

            match result {
                Ok(true) => return (true, panics),
                Ok(false) => {}
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Handler #{} panicked: {}. \
                         Remaining handlers continue to run.",
                        idx, panic_msg
                    );
                    panics += 1;
                }
            }
        }

        (false, panics)
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
