//! Prefixed, leveled logging with an injectable sink.
//!
//! The client never picks a log destination itself. By default every event
//! goes through the `log` facade under the `dhl_api` target, and the host
//! application decides where it ends up. Callers that need a dedicated sink
//! (a buffer, a per-tenant file) pass their own [`LogSink`].

use log::Level;
use std::sync::Arc;

pub const LOG_TARGET: &str = "dhl_api";

/// Destination for client log events.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink: Send + Sync {
    fn write(&self, level: Level, message: &str);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl LogSink for LogFacade {
    fn write(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// Sink plus the configured message prefix.
#[derive(Clone)]
pub struct Logger {
    prefix: String,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(prefix: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            prefix: prefix.into(),
            sink,
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(Level::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(Level::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(Level::Error, message.as_ref());
    }

    /// Progress output, such as the URL about to be called.
    pub fn out(&self, message: impl AsRef<str>) {
        self.emit(Level::Debug, message.as_ref());
    }

    fn emit(&self, level: Level, message: &str) {
        self.sink.write(level, &format!("{}{}", self.prefix, message));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("", Arc::new(LogFacade))
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
