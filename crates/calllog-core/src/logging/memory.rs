//! In-memory logger capturing records for assertions

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::{Logger, LoggerFactory, SharedLogger};
use crate::types::Severity;

/// A record captured by a [`MemoryLogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Name of the logger the record was written to
    pub logger: String,
    pub severity: Severity,
    pub message: String,
    /// `Display` text of the attached error, if any
    pub error: Option<String>,
}

/// Logger that appends every record to a shared buffer
#[derive(Debug, Clone)]
pub struct MemoryLogger {
    name: String,
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl MemoryLogger {
    fn push(&self, severity: Severity, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.records.lock().push(CapturedRecord {
            logger: self.name.clone(),
            severity,
            message: message.to_string(),
            error: error.map(|e| e.to_string()),
        });
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(Severity::Info, message, None);
    }

    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.push(Severity::Warn, message, error);
    }

    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.push(Severity::Error, message, error);
    }
}

/// Creates [`MemoryLogger`]s that all write into one buffer
///
/// Clones share the buffer, so a clone kept by a test sees everything
/// written through the interceptor.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoggerFactory {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
    created: Arc<AtomicUsize>,
}

impl MemoryLoggerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured records, in write order
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    /// Captured messages, in write order
    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    /// Number of records at the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    /// How many loggers this factory has handed out
    pub fn loggers_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Drop all captured records
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LoggerFactory for MemoryLoggerFactory {
    fn get_logger(&self, name: &str) -> SharedLogger {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(MemoryLogger {
            name: name.to_string(),
            records: Arc::clone(&self.records),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogRecord;

    #[test]
    fn test_memory_logger_captures() {
        let factory = MemoryLoggerFactory::new();
        let logger = factory.get_logger("shop::Cart");
        let err = std::io::Error::other("boom");

        logger.info("one");
        logger.warn("two", None);
        logger.log(&LogRecord::failure(Severity::Error, "three", &err));

        let records = factory.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].logger, "shop::Cart");
        assert_eq!(records[1].severity, Severity::Warn);
        assert_eq!(records[2].error.as_deref(), Some("boom"));
        assert_eq!(factory.messages(), vec!["one", "two", "three"]);
        assert_eq!(factory.count(Severity::Error), 1);
        assert_eq!(factory.loggers_created(), 1);

        factory.clear();
        assert!(factory.records().is_empty());
    }
}
