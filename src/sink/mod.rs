//! Output sink shared by a logger and its children
//!
//! The sink owns the byte destinations. Every write holds the output lock for
//! the whole line (newline included), so lines from concurrent callers never
//! interleave. Hijackers run before the lock is taken.

pub mod hijack;
pub mod scan;

pub use hijack::{Hijacker, WriteContext};
pub use scan::{CancelHandle, ScanRenderer, MAX_SCAN_LINE};

use crate::core::error::{LoggerError, Result};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::io::{self, IsTerminal, Read, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Output = Box<dyn Write + Send>;

pub struct Sink {
    outputs: Mutex<Vec<Output>>,
    hijackers: RwLock<Vec<Hijacker>>,
    colors: AtomicBool,
}

impl Sink {
    /// Sink writing to a single destination, colors off.
    pub fn new(output: impl Write + Send + 'static) -> Self {
        Self {
            outputs: Mutex::new(vec![Box::new(output)]),
            hijackers: RwLock::new(Vec::new()),
            colors: AtomicBool::new(false),
        }
    }

    /// Sink writing to process stdout, colors on when stdout is a terminal.
    pub fn stdout() -> Self {
        let sink = Self::new(io::stdout());
        sink.set_colors(io::stdout().is_terminal());
        sink
    }

    /// Sink that accepts and drops everything.
    pub fn discard() -> Self {
        Self::new(io::sink())
    }

    /// Write `bytes` as-is.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        self.emit(bytes, false)
    }

    /// Write `bytes` followed by a newline.
    pub fn write_line(&self, bytes: &[u8]) -> Result<()> {
        self.emit(bytes, true)
    }

    fn emit(&self, bytes: &[u8], newline: bool) -> Result<()> {
        let mut ctx = WriteContext::new(bytes, newline);
        for (idx, hijacker) in self.hijackers.read().iter().enumerate() {
            let result = panic::catch_unwind(panic::AssertUnwindSafe(|| hijacker(&mut ctx)));
            if let Err(panic_info) = result {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Hijacker #{} panicked: {}. \
                     The write continues with the remaining hijackers.",
                    idx, panic_msg
                );
            }
            if ctx.is_skipped() {
                return Ok(());
            }
        }

        let mut first_error = None;
        let mut outputs = self.outputs.lock();
        for (idx, output) in outputs.iter_mut().enumerate() {
            if let Err(e) = Self::write_one(output, ctx.bytes(), ctx.is_newline()) {
                first_error.get_or_insert_with(|| {
                    LoggerError::io_operation(format!("writing to output #{}", idx), e.to_string(), e)
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn write_one(output: &mut Output, bytes: &[u8], newline: bool) -> io::Result<()> {
        output.write_all(bytes)?;
        if newline {
            output.write_all(b"\n")?;
        }
        output.flush()
    }

    /// Add destinations. Colors are turned off since the new writers are not
    /// known to be terminals; use [`set_colors`](Self::set_colors) to force them.
    pub fn add_output(&self, output: impl Write + Send + 'static) {
        self.outputs.lock().push(Box::new(output));
        self.set_colors(false);
    }

    /// Replace every destination with `output`.
    pub fn set_output(&self, output: impl Write + Send + 'static) {
        let mut outputs = self.outputs.lock();
        outputs.clear();
        outputs.push(Box::new(output));
        self.set_colors(false);
    }

    pub fn output_count(&self) -> usize {
        self.outputs.lock().len()
    }

    /// Register a hijacker. Hijackers run in registration order and must not
    /// call back into this sink's `hijack`. A panicking hijacker is reported on
    /// stderr and the write goes on with whatever it left in the context.
    pub fn hijack(&self, hijacker: Hijacker) {
        self.hijackers.write().push(hijacker);
    }

    pub fn supports_colors(&self) -> bool {
        self.colors.load(Ordering::Relaxed)
    }

    pub fn set_colors(&self, enabled: bool) {
        self.colors.store(enabled, Ordering::Relaxed);
    }

    pub fn flush(&self) -> Result<()> {
        let mut outputs = self.outputs.lock();
        for output in outputs.iter_mut() {
            output.flush()?;
        }
        Ok(())
    }

    /// Read `reader` line by line on a background thread, rendering each
    /// non-empty line with `render` and writing it until end of stream or
    /// cancellation.
    pub fn scan_into<R>(
        self: &Arc<Self>,
        reader: R,
        newline: bool,
        render: ScanRenderer,
    ) -> Result<CancelHandle>
    where
        R: Read + Send + 'static,
    {
        scan::spawn(Arc::clone(self), reader, newline, render)
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("outputs", &self.output_count())
            .field("hijackers", &self.hijackers.read().len())
            .field("colors", &self.supports_colors())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_and_write_line() {
        let buffer = SharedBuffer::default();
        let sink = Sink::new(buffer.clone());

        sink.write(b"a").unwrap();
        sink.write_line(b"b").unwrap();
        assert_eq!(buffer.contents(), "ab\n");
    }

    #[test]
    fn test_fan_out_to_all_outputs() {
        let first = SharedBuffer::default();
        let second = SharedBuffer::default();
        let sink = Sink::new(first.clone());
        sink.add_output(second.clone());

        sink.write_line(b"both").unwrap();
        assert_eq!(first.contents(), "both\n");
        assert_eq!(second.contents(), "both\n");
        assert_eq!(sink.output_count(), 2);
    }

    #[test]
    fn test_set_output_replaces() {
        let old = SharedBuffer::default();
        let new = SharedBuffer::default();
        let sink = Sink::new(old.clone());
        sink.set_output(new.clone());

        sink.write_line(b"x").unwrap();
        assert_eq!(old.contents(), "");
        assert_eq!(new.contents(), "x\n");
    }

    #[test]
    fn test_failing_output_does_not_block_others() {
        let buffer = SharedBuffer::default();
        let sink = Sink::new(FailingWriter);
        sink.add_output(buffer.clone());

        let err = sink.write_line(b"still delivered").unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert_eq!(buffer.contents(), "still delivered\n");
    }

    #[test]
    fn test_hijacker_transforms_and_skips() {
        let buffer = SharedBuffer::default();
        let sink = Sink::new(buffer.clone());
        sink.hijack(Arc::new(|ctx: &mut WriteContext<'_>| {
            if ctx.bytes().starts_with(b"secret") {
                ctx.skip();
            } else {
                let upper = ctx.bytes().to_ascii_uppercase();
                ctx.set_bytes(upper);
            }
        }));

        sink.write_line(b"secret token").unwrap();
        sink.write_line(b"hello").unwrap();
        assert_eq!(buffer.contents(), "HELLO\n");
    }

    #[test]
    fn test_panicking_hijacker_does_not_stop_write() {
        let buffer = SharedBuffer::default();
        let sink = Sink::new(buffer.clone());
        sink.hijack(Arc::new(|_: &mut WriteContext<'_>| panic!("bad hijacker")));
        sink.hijack(Arc::new(|ctx: &mut WriteContext<'_>| {
            let mut bytes = b"seen: ".to_vec();
            bytes.extend_from_slice(ctx.bytes());
            ctx.set_bytes(bytes);
        }));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sink.write_line(b"line")
        }));

        assert!(matches!(result, Ok(Ok(()))));
        assert_eq!(buffer.contents(), "seen: line\n");
    }

    #[test]
    fn test_add_output_disables_colors() {
        let sink = Sink::discard();
        sink.set_colors(true);
        sink.add_output(io::sink());
        assert!(!sink.supports_colors());
    }

    #[test]
    fn test_scan_until_eof() {
        let buffer = SharedBuffer::default();
        let sink = Arc::new(Sink::new(buffer.clone()));
        let render: ScanRenderer = Arc::new(|line: &str, out: &mut Vec<u8>| {
            out.extend_from_slice(b"> ");
            out.extend_from_slice(line.as_bytes());
        });

        let handle = sink
            .scan_into(Cursor::new("one\r\n\ntwo\nthree"), true, render)
            .unwrap();
        handle.join();

        assert!(handle.is_finished());
        assert_eq!(buffer.contents(), "> one\n> two\n> three\n");
    }

    #[test]
    fn test_scan_splits_overlong_lines() {
        let buffer = SharedBuffer::default();
        let sink = Arc::new(Sink::new(buffer.clone()));
        let render: ScanRenderer = Arc::new(|line: &str, out: &mut Vec<u8>| {
            out.extend_from_slice(line.as_bytes());
        });

        let mut input = vec![b'a'; MAX_SCAN_LINE * 2 + 10];
        input.extend_from_slice(b"\nend\n");
        let handle = sink.scan_into(Cursor::new(input), true, render).unwrap();
        handle.join();

        let contents = buffer.contents();
        let lengths: Vec<usize> = contents.lines().map(str::len).collect();
        assert_eq!(lengths, vec![MAX_SCAN_LINE, MAX_SCAN_LINE, 10, 3]);
        assert!(contents.ends_with("end\n"));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let sink = Arc::new(Sink::discard());
        let render: ScanRenderer = Arc::new(|line: &str, out: &mut Vec<u8>| {
            out.extend_from_slice(line.as_bytes());
        });
        let handle = sink.scan_into(io::empty(), true, render).unwrap();

        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());

        handle.join();
        std::thread::sleep(Duration::from_millis(1));
        assert!(handle.is_finished());
    }
}
