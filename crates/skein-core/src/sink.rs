//! Error/warning accumulation channel.
//!
//! Internal code never throws across the ABI. Instead every failure is
//! formatted into a bounded message and appended to an [`ErrorSink`]
//! owned by the caller. [`Reporter`] is the copyable handle internal code
//! passes around; when the host supplied no sink, every report is a
//! silent no-op.

use std::cell::RefCell;
use std::fmt::{self, Write as _};

use crate::limits::{truncate_utf8, MAX_MESSAGE_LEN};

/// Severity of a diagnostic, selecting its prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// An operation failed.
    Error,
    /// An operation succeeded in a degraded way.
    Warning,
}

impl Severity {
    /// Prefix written in front of every message of this severity.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Error => "Error: ",
            Self::Warning => "Warning: ",
        }
    }
}

/// Caller-owned, append-only destination for diagnostic text.
///
/// The substrate only ever appends; capacity and truncation policy belong
/// to the implementor. `append` takes `&self` so that a profiler and the
/// code it instruments can share one sink during a call.
///
/// Implementations must not panic.
pub trait ErrorSink {
    /// Append `text` verbatim.
    fn append(&self, text: &str);
}

impl ErrorSink for RefCell<String> {
    fn append(&self, text: &str) {
        // A re-entrant append from inside a Display impl is dropped.
        if let Ok(mut buf) = self.try_borrow_mut() {
            buf.push_str(text);
        }
    }
}

impl ErrorSink for parking_lot::Mutex<String> {
    fn append(&self, text: &str) {
        self.lock().push_str(text);
    }
}

/// Copyable handle to an optional [`ErrorSink`].
#[derive(Clone, Copy, Default)]
pub struct Reporter<'a> {
    sink: Option<&'a dyn ErrorSink>,
}

impl<'a> Reporter<'a> {
    /// A reporter with no sink attached; every report is discarded.
    pub const fn none() -> Self {
        Self { sink: None }
    }

    /// A reporter appending to `sink`.
    pub fn new(sink: &'a dyn ErrorSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// A reporter appending to `sink` if one was supplied.
    pub fn from_option(sink: Option<&'a dyn ErrorSink>) -> Self {
        Self { sink }
    }

    /// Returns `true` if reports reach a sink.
    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Format `args` (bounded to [`MAX_MESSAGE_LEN`] bytes) and append it
    /// with the severity prefix and a trailing newline.
    ///
    /// Nothing is formatted when no sink is attached. Formatting errors
    /// raised by `Display` impls are swallowed; whatever was written before
    /// the error is still appended.
    pub fn report(&self, severity: Severity, args: fmt::Arguments<'_>) {
        let Some(sink) = self.sink else {
            return;
        };

        let mut msg = BoundedMessage::new(severity.prefix());
        let _ = msg.write_fmt(args);
        let text = msg.finish();

        match severity {
            Severity::Error => tracing::error!(target: "skein::diag", "{}", text.trim_end()),
            Severity::Warning => tracing::warn!(target: "skein::diag", "{}", text.trim_end()),
        }
        sink.append(&text);
    }

    /// Report an error.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.report(Severity::Error, args);
    }

    /// Report a warning.
    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.report(Severity::Warning, args);
    }
}

impl fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Message buffer that stops accepting text once the body reaches
/// [`MAX_MESSAGE_LEN`] bytes.
struct BoundedMessage {
    buf: String,
    body_start: usize,
    full: bool,
}

impl BoundedMessage {
    fn new(prefix: &str) -> Self {
        let mut buf = String::with_capacity(prefix.len() + 64);
        buf.push_str(prefix);
        Self {
            body_start: buf.len(),
            buf,
            full: false,
        }
    }

    fn finish(mut self) -> String {
        if !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
        self.buf
    }
}

impl fmt::Write for BoundedMessage {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Err(fmt::Error);
        }
        let room = MAX_MESSAGE_LEN - (self.buf.len() - self.body_start);
        let part = truncate_utf8(s, room);
        self.buf.push_str(part);
        if part.len() < s.len() {
            self.full = true;
            return Err(fmt::Error);
        }
        Ok(())
    }
}

/// Report an error through a [`Reporter`] with `format!`-style arguments.
#[macro_export]
macro_rules! report_error {
    ($reporter:expr, $($arg:tt)+) => {
        $reporter.error(::core::format_args!($($arg)+))
    };
}

/// Report a warning through a [`Reporter`] with `format!`-style arguments.
#[macro_export]
macro_rules! report_warning {
    ($reporter:expr, $($arg:tt)+) => {
        $reporter.warning(::core::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Failing;

    impl fmt::Display for Failing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn error_and_warning_prefixes() {
        let sink = RefCell::new(String::new());
        let r = Reporter::new(&sink);
        report_error!(r, "bad vertex count {}", 7);
        report_warning!(r, "degenerate triangle at {}", 3);
        assert_eq!(
            sink.borrow().as_str(),
            "Error: bad vertex count 7\nWarning: degenerate triangle at 3\n"
        );
    }

    #[test]
    fn trailing_newline_not_doubled() {
        let sink = RefCell::new(String::new());
        report_error!(Reporter::new(&sink), "already terminated\n");
        assert_eq!(sink.borrow().as_str(), "Error: already terminated\n");
    }

    #[test]
    fn no_sink_is_silent() {
        let r = Reporter::none();
        assert!(!r.is_attached());
        report_error!(r, "{} {:?}", Failing, vec![1, 2, 3]);
        report_warning!(r, "{}", "x".repeat(10 * MAX_MESSAGE_LEN));
    }

    #[test]
    fn long_messages_are_truncated() {
        let sink = RefCell::new(String::new());
        report_warning!(Reporter::new(&sink), "{}", "y".repeat(3 * MAX_MESSAGE_LEN));
        let text = sink.borrow();
        assert_eq!(
            text.len(),
            Severity::Warning.prefix().len() + MAX_MESSAGE_LEN + 1
        );
        assert!(text.ends_with("y\n"));
    }

    #[test]
    fn failing_display_keeps_partial_text() {
        let sink = RefCell::new(String::new());
        report_error!(Reporter::new(&sink), "value={}", Failing);
        assert_eq!(sink.borrow().as_str(), "Error: value=partial\n");
    }

    #[test]
    fn reentrant_append_is_dropped() {
        let sink = RefCell::new(String::new());
        let _held = sink.borrow_mut();
        // Must not panic while the buffer is already borrowed.
        sink.append("lost");
    }

    #[test]
    fn mutex_sink_accumulates() {
        let sink = parking_lot::Mutex::new(String::from("host: "));
        report_warning!(Reporter::new(&sink), "w");
        assert_eq!(sink.lock().as_str(), "host: Warning: w\n");
    }

    #[test]
    fn reporter_is_copy_and_shares_sink() {
        let sink = RefCell::new(String::new());
        let a = Reporter::from_option(Some(&sink));
        let b = a;
        report_error!(a, "one");
        report_error!(b, "two");
        assert_eq!(sink.borrow().lines().count(), 2);
    }

    proptest! {
        #[test]
        fn body_never_exceeds_bound(s in ".{0,3000}") {
            let sink = RefCell::new(String::new());
            report_error!(Reporter::new(&sink), "{}", s);
            let text = sink.borrow();
            prop_assert!(text.len() <= Severity::Error.prefix().len() + MAX_MESSAGE_LEN + 1);
            prop_assert!(text.starts_with("Error: "));
        }
    }
}
