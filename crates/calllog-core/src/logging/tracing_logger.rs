//! Logger forwarding records to the `tracing` ecosystem

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use super::traits::{Logger, LoggerFactory, LoggingError, LoggingResult, SharedLogger};

/// Emits records as `tracing` events carrying a `logger` field
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(logger = %self.name, "{}", message);
    }

    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        match error {
            Some(err) => tracing::warn!(logger = %self.name, error = %err, "{}", message),
            None => tracing::warn!(logger = %self.name, "{}", message),
        }
    }

    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        match error {
            Some(err) => tracing::error!(logger = %self.name, error = %err, "{}", message),
            None => tracing::error!(logger = %self.name, "{}", message),
        }
    }
}

/// Creates a [`TracingLogger`] per type
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggerFactory;

impl LoggerFactory for TracingLoggerFactory {
    fn get_logger(&self, name: &str) -> SharedLogger {
        Arc::new(TracingLogger::new(name))
    }
}

/// Install a global fmt subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already set.
pub fn init_tracing(default_filter: &str) -> LoggingResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
