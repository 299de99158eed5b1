//! Reusable log records
//!
//! The pool is a bounded free list built on a crossbeam channel. A record is
//! moved out on `acquire` and moved back on release, so two callers can never
//! hold the same record. The pool is a cache only: when it is empty a new
//! record is allocated, and when it is full a released record is dropped.

use super::log_level::LogLevel;
use super::log_record::{LogRecord, RecordContext};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Idle records kept per logger
pub const DEFAULT_POOL_CAPACITY: usize = 64;

pub struct RecordPool {
    idle_tx: Sender<LogRecord>,
    idle_rx: Receiver<LogRecord>,
}

impl RecordPool {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (idle_tx, idle_rx) = bounded(capacity);
        Self { idle_tx, idle_rx }
    }

    /// Take an idle record (or allocate one) and overwrite all of its fields.
    ///
    /// The record goes back to the pool when the returned guard is dropped,
    /// including during unwinding.
    pub(crate) fn acquire(
        &self,
        level: LogLevel,
        args: fmt::Arguments<'_>,
        newline: bool,
        context: RecordContext,
    ) -> PooledRecord<'_> {
        let mut record = self.idle_rx.try_recv().unwrap_or_else(|_| LogRecord::empty());
        record.reset(level, args, newline, context);
        PooledRecord {
            pool: self,
            record: Some(record),
        }
    }

    fn release(&self, record: LogRecord) {
        // Full pool: let the record drop.
        let _ = self.idle_tx.try_send(record);
    }

    /// Number of records currently idle. Informational only.
    pub fn idle(&self) -> usize {
        self.idle_rx.len()
    }

    pub fn capacity(&self) -> usize {
        self.idle_tx.capacity().unwrap_or(0)
    }
}

impl Default for RecordPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordPool")
            .field("idle", &self.idle())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// A record on loan from a [`RecordPool`].
pub(crate) struct PooledRecord<'a> {
    pool: &'a RecordPool,
    // `None` only once the guard has been dropped.
    record: Option<LogRecord>,
}

impl Deref for PooledRecord<'_> {
    type Target = LogRecord;

    fn deref(&self) -> &LogRecord {
        self.record.as_ref().expect("record present until drop")
    }
}

impl DerefMut for PooledRecord<'_> {
    fn deref_mut(&mut self) -> &mut LogRecord {
        self.record.as_mut().expect("record present until drop")
    }
}

impl Drop for PooledRecord<'_> {
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            self.pool.release(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_acquire_allocates_when_empty() {
        let pool = RecordPool::with_capacity(4);
        assert_eq!(pool.idle(), 0);

        let record = pool.acquire(LogLevel::Info, format_args!("hello"), true, RecordContext::default());
        assert_eq!(record.message(), "hello");
        assert_eq!(pool.idle(), 0);

        drop(record);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_released_record_is_reused_and_reset() {
        let pool = RecordPool::with_capacity(4);
        drop(pool.acquire(LogLevel::Error, format_args!("first"), true, RecordContext::default()));

        let record = pool.acquire(LogLevel::Debug, format_args!("second"), false, RecordContext::default());
        assert_eq!(pool.idle(), 0);
        assert_eq!(record.level(), LogLevel::Debug);
        assert_eq!(record.message(), "second");
        assert!(!record.is_newline());
    }

    #[test]
    fn test_full_pool_drops_extra_records() {
        let pool = RecordPool::with_capacity(1);
        let a = pool.acquire(LogLevel::Info, format_args!("a"), true, RecordContext::default());
        let b = pool.acquire(LogLevel::Info, format_args!("b"), true, RecordContext::default());
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_rendered_record_is_released_once() {
        let pool = RecordPool::with_capacity(2);
        {
            let mut record =
                pool.acquire(LogLevel::Warn, format_args!("slow"), true, RecordContext::default());
            assert_eq!(record.render(false), b"WARN slow");
        }
        assert_eq!(pool.idle(), 1);

        drop(pool.acquire(LogLevel::Info, format_args!("again"), true, RecordContext::default()));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_release_on_unwind() {
        let pool = RecordPool::with_capacity(2);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _record =
                pool.acquire(LogLevel::Info, format_args!("boom"), true, RecordContext::default());
            panic!("handler failure");
        }));
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_concurrent_acquire_never_shares_a_record() {
        let pool = Arc::new(RecordPool::with_capacity(8));
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|id| {
                let pool = Arc::clone(&pool);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let mut checked = 0;
                    for i in 0..200 {
                        barrier.wait();
                        let record = pool.acquire(
                            LogLevel::Info,
                            format_args!("{}-{}", id, i),
                            true,
                            RecordContext::default(),
                        );
                        // The message must still be ours after every other thread acquired.
                        barrier.wait();
                        assert_eq!(record.message(), format!("{}-{}", id, i));
                        checked += 1;
                    }
                    checked
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 200);
        }
        assert!(pool.idle() <= pool.capacity());
    }
}
