//! Low-level interception of sink writes

use std::borrow::Cow;
use std::sync::Arc;

/// Callback run on every sink write before any output sees the bytes.
pub type Hijacker = Arc<dyn Fn(&mut WriteContext<'_>) + Send + Sync>;

/// A pending write as seen by hijackers.
///
/// Hijackers may replace the bytes, toggle the trailing newline, or skip the
/// write entirely. Once a hijacker skips, later hijackers are not called.
#[derive(Debug)]
pub struct WriteContext<'a> {
    bytes: Cow<'a, [u8]>,
    newline: bool,
    skipped: bool,
}

impl<'a> WriteContext<'a> {
    pub(crate) fn new(bytes: &'a [u8], newline: bool) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            newline,
            skipped: false,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_bytes(&mut self, bytes: impl Into<Vec<u8>>) {
        self.bytes = Cow::Owned(bytes.into());
    }

    pub fn is_newline(&self) -> bool {
        self.newline
    }

    pub fn set_newline(&mut self, newline: bool) {
        self.newline = newline;
    }

    /// Drop this write; no output will receive it.
    pub fn skip(&mut self) {
        self.skipped = true;
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_until_replaced() {
        let source = b"INFO ready".to_vec();
        let mut ctx = WriteContext::new(&source, true);
        assert!(matches!(ctx.bytes, Cow::Borrowed(_)));

        ctx.set_bytes("INFO replaced");
        assert_eq!(ctx.bytes(), b"INFO replaced");
        assert!(ctx.is_newline());
        assert!(!ctx.is_skipped());
    }

    #[test]
    fn test_skip() {
        let mut ctx = WriteContext::new(b"x", false);
        ctx.skip();
        assert!(ctx.is_skipped());
    }
}
