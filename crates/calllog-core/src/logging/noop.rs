//! No-op logger implementation

use std::error::Error;
use std::sync::Arc;

use super::traits::{Logger, LoggerFactory, SharedLogger};

/// A logger that does nothing
///
/// Useful for benchmarks or when interception should stay silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    /// Create a new no-op logger
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str, _error: Option<&(dyn Error + 'static)>) {}
    fn error(&self, _message: &str, _error: Option<&(dyn Error + 'static)>) {}
}

/// Hands out [`NoOpLogger`]s for every type
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLoggerFactory;

impl LoggerFactory for NoOpLoggerFactory {
    fn get_logger(&self, _name: &str) -> SharedLogger {
        Arc::new(NoOpLogger)
    }
}
