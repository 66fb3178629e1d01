//! Console logger implementation

use std::error::Error;
use std::sync::Arc;

use super::traits::{Logger, LoggerFactory, SharedLogger};

const DEFAULT_PREFIX: &str = "[calllog]";

/// A logger that outputs to the console (stdout/stderr)
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    name: String,
}

impl ConsoleLogger {
    /// Create a console logger for a type name with the default prefix
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_prefix(DEFAULT_PREFIX, name)
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    fn line(&self, level: &str, message: &str, error: Option<&(dyn Error + 'static)>) -> String {
        match error {
            Some(err) => format!("{} {} {}: {} ({})", self.prefix, level, self.name, message, err),
            None => format!("{} {} {}: {}", self.prefix, level, self.name, message),
        }
    }
}

impl Logger for ConsoleLogger {
    fn info(&self, message: &str) {
        println!("{}", self.line("INFO", message, None));
    }

    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        eprintln!("{}", self.line("WARN", message, error));
    }

    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        eprintln!("{}", self.line("ERROR", message, error));
    }
}

/// Creates a [`ConsoleLogger`] per type, sharing one prefix
#[derive(Debug, Clone)]
pub struct ConsoleLoggerFactory {
    prefix: String,
}

impl Default for ConsoleLoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLoggerFactory {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl LoggerFactory for ConsoleLoggerFactory {
    fn get_logger(&self, name: &str) -> SharedLogger {
        Arc::new(ConsoleLogger::with_prefix(self.prefix.clone(), name))
    }
}
