//! Timestamped, multi-sink logging.
//!
//! A [`Logger`] fans every message out to zero or more registered sinks,
//! one line per message, prefixed with a bracketed UTC timestamp:
//!
//! ```text
//! [2024-05-01T12:00:00Z] Generation 3 complete
//! ```
//!
//! Each message is also forwarded to the [`log`] facade so that
//! applications with an installed logger see the same events.

use chrono::Utc;
use log::Level;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

type Sink = Box<dyn Write + Send>;

/// Cloneable handle to a set of output sinks.
///
/// Clones share the same sinks. Write failures on a sink are ignored so
/// that logging never interrupts the caller.
#[derive(Clone, Default)]
pub struct Logger {
    sinks: Arc<Mutex<Vec<Sink>>>,
}

impl Logger {
    /// Creates a logger with no sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an output sink.
    pub fn add_sink<W: Write + Send + 'static>(&self, sink: W) {
        self.sinks.lock().push(Box::new(sink));
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Writes one timestamped line to every sink and forwards it to `log`.
    pub fn emit(&self, level: Level, message: impl fmt::Display) {
        let line = format!("{}{}", wrapped_timestamp(), message);
        log::log!(target: "u_evolve", level, "{message}");

        let mut sinks = self.sinks.lock();
        for sink in sinks.iter_mut() {
            let _ = writeln!(sink, "{line}");
            let _ = sink.flush();
        }
    }

    /// Shorthand for [`emit`](Self::emit) at `Info` level.
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message);
    }

    /// Shorthand for [`emit`](Self::emit) at `Warn` level.
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Level::Warn, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sink_count())
            .finish()
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Current UTC time wrapped as a line prefix: `"[...] "`.
pub fn wrapped_timestamp() -> String {
    format!("[{}] ", utc_timestamp())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory sink whose contents can be read back after logging.
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("sink closed"))
        }
    }

    #[test]
    fn test_timestamp_format() {
        let ts = utc_timestamp();
        assert_eq!(ts.len(), "yyyy-mm-ddThh:mm:ssZ".len());
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn test_fan_out_to_all_sinks() {
        let logger = Logger::new();
        let a = SharedBuffer::default();
        let b = SharedBuffer::default();
        logger.add_sink(a.clone());
        logger.add_sink(b.clone());

        logger.info("hello");

        for out in [a.contents(), b.contents()] {
            assert!(out.starts_with('['), "missing timestamp: {out}");
            assert!(out.ends_with("] hello\n"), "unexpected line: {out}");
        }
    }

    #[test]
    fn test_no_sinks_is_fine() {
        let logger = Logger::new();
        logger.info("nobody listens");
        assert_eq!(logger.sink_count(), 0);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let logger = Logger::new();
        let good = SharedBuffer::default();
        logger.add_sink(FailingSink);
        logger.add_sink(good.clone());

        logger.warn("still delivered");
        assert!(good.contents().contains("still delivered"));
    }

    #[test]
    fn test_clones_share_sinks() {
        let logger = Logger::new();
        let clone = logger.clone();
        let buf = SharedBuffer::default();
        clone.add_sink(buf.clone());

        logger.info("one");
        clone.info("two");

        assert_eq!(buf.contents().lines().count(), 2);
    }
}
