//! Dispatch metrics for observability
//!
//! Counters describing what happened to each print call: filtered by the
//! level threshold, consumed by a handler, or written to the sink.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-logger dispatch counters
///
/// # Example
///
/// ```
/// use rust_log_dispatch::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_handled();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.handled(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines written to the sink by the default path
    emitted: AtomicU64,

    /// Records consumed by a handler
    handled: AtomicU64,

    /// Calls rejected by the level threshold
    filtered: AtomicU64,

    /// Sink writes that returned an error
    write_failures: AtomicU64,

    /// Handler invocations that panicked
    handler_panics: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            handled: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            handler_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_panics(&self) -> u64 {
        self.handler_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_panics(&self, count: u64) -> u64 {
        self.handler_panics.fetch_add(count, Ordering::Relaxed)
    }

    /// Share of dispatched records consumed by handlers, as a percentage.
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn handled_rate(&self) -> f64 {
        let handled = self.handled() as f64;
        let total = handled + self.emitted() as f64 + self.write_failures() as f64;
        if total == 0.0 {
            0.0
        } else {
            (handled / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.handled.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.handler_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            emitted: AtomicU64::new(self.emitted()),
            handled: AtomicU64::new(self.handled()),
            filtered: AtomicU64::new(self.filtered()),
            write_failures: AtomicU64::new(self.write_failures()),
            handler_panics: AtomicU64::new(self.handler_panics()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.emitted(), 0);
        assert_eq!(metrics.handled(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.handler_panics(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_filtered(), 0);
        assert_eq!(metrics.record_filtered(), 1);
        assert_eq!(metrics.filtered(), 2);

        metrics.record_handler_panics(3);
        assert_eq!(metrics.handler_panics(), 3);
    }

    #[test]
    fn test_handled_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.handled_rate(), 0.0);

        for _ in 0..75 {
            metrics.record_emitted();
        }
        for _ in 0..25 {
            metrics.record_handled();
        }

        let rate = metrics.handled_rate();
        assert!((24.9..=25.1).contains(&rate), "Handled rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_emitted();
        metrics.record_write_failure();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.emitted(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(snapshot.emitted(), 1);
        assert_eq!(snapshot.write_failures(), 1);
    }
}
