//! Logger and logger factory traits

use std::error::Error;
use std::sync::Arc;

use crate::types::{LogRecord, Severity};

/// Destination for the records of one target type
///
/// Implementations:
/// - `NoOpLogger`: Silent logger
/// - `ConsoleLogger`: Logs to stdout/stderr
/// - `TracingLogger`: Forwards to the `tracing` ecosystem
/// - `MemoryLogger`: Captures records in memory
pub trait Logger: Send + Sync {
    /// Log an info message
    fn info(&self, message: &str);

    /// Log a warning, optionally with the error that caused it
    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>);

    /// Log an error, optionally with the error that caused it
    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>);

    /// Dispatch a record to the method matching its severity
    fn log(&self, record: &LogRecord<'_>) {
        match record.severity {
            Severity::Info => self.info(record.message),
            Severity::Warn => self.warn(record.message, record.error),
            Severity::Error => self.error(record.message, record.error),
        }
    }
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Resolves the logger for a fully-qualified type name
///
/// Called at most once per name by [`LoggerCache`](super::LoggerCache).
pub trait LoggerFactory: Send + Sync {
    fn get_logger(&self, name: &str) -> SharedLogger;
}

impl<F> LoggerFactory for F
where
    F: Fn(&str) -> SharedLogger + Send + Sync,
{
    fn get_logger(&self, name: &str) -> SharedLogger {
        self(name)
    }
}

/// Errors raised while setting up a logging backend
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

pub type LoggingResult<T> = Result<T, LoggingError>;
