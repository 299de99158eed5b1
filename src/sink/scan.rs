//! Continuous stream scanning into a sink

use super::Sink;
use crate::core::error::Result;
use parking_lot::Mutex;
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Turns one scanned line (without its line terminator) into output bytes.
pub type ScanRenderer = Arc<dyn Fn(&str, &mut Vec<u8>) + Send + Sync>;

/// Longest line read in one piece. A longer line is emitted as consecutive
/// chunks of at most this many bytes, so a stream without line breaks never
/// grows the read buffer past this size.
pub const MAX_SCAN_LINE: usize = 64 * 1024;

/// Stops a running scan.
///
/// Cancellation and the scan's writes are serialized on the same lock: once
/// [`cancel`](Self::cancel) returns, the scan loop will not start another
/// write. Cancelling more than once is a no-op. The reader is dropped when the
/// loop next wakes up (a blocked read has to return first).
#[derive(Clone)]
pub struct CancelHandle {
    cancelled: Arc<Mutex<bool>>,
    finished: Arc<AtomicBool>,
    worker: Arc<Mutex<Option<thread::JoinHandle<()>>>>,
}

impl CancelHandle {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(Mutex::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
            worker: Arc::new(Mutex::new(None)),
        }
    }

    pub fn cancel(&self) {
        *self.cancelled.lock() = true;
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock()
    }

    /// True once the scan loop has exited (end of stream, read error or
    /// observed cancellation).
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Block until the scan loop exits.
    ///
    /// Only returns for streams that reach end-of-file or after a cancelled
    /// scan's pending read completes.
    pub fn join(&self) {
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(e) = worker.join() {
                eprintln!("[LOGGER ERROR] Scan worker panicked: {:?}", e);
            }
        }
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .field("finished", &self.is_finished())
            .finish()
    }
}

pub(super) fn spawn<R>(
    sink: Arc<Sink>,
    reader: R,
    newline: bool,
    render: ScanRenderer,
) -> Result<CancelHandle>
where
    R: Read + Send + 'static,
{
    let handle = CancelHandle::new();
    let cancelled = Arc::clone(&handle.cancelled);
    let finished = Arc::clone(&handle.finished);

    let worker = thread::Builder::new()
        .name("log-scan".to_string())
        .spawn(move || {
            run(&sink, reader, newline, &render, &cancelled);
            finished.store(true, Ordering::Release);
        })
        .map_err(|e| {
            crate::core::LoggerError::io_operation("spawning scan worker", e.to_string(), e)
        })?;

    *handle.worker.lock() = Some(worker);
    Ok(handle)
}

fn run<R: Read>(
    sink: &Sink,
    reader: R,
    newline: bool,
    render: &ScanRenderer,
    cancelled: &Mutex<bool>,
) {
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    let mut rendered = Vec::new();

    loop {
        if *cancelled.lock() {
            break;
        }

        raw.clear();
        match (&mut reader).take(MAX_SCAN_LINE as u64).read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Scan read failed: {}", e);
                break;
            }
        }

        let text = String::from_utf8_lossy(&raw);
        let text = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if text.is_empty() {
            continue;
        }

        rendered.clear();
        render(text, &mut rendered);

        let guard = cancelled.lock();
        if *guard {
            break;
        }
        let result = if newline {
            sink.write_line(&rendered)
        } else {
            sink.write(&rendered)
        };
        drop(guard);

        if let Err(e) = result {
            eprintln!("[LOGGER ERROR] Scan write failed: {}", e);
        }
    }
}
