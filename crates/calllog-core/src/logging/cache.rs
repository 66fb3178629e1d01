//! Memoized logger lookup keyed by type name

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{LoggerFactory, SharedLogger};

/// Lazily populated map from type name to logger
///
/// The factory runs at most once per name, even when many threads ask for
/// the same name for the first time concurrently.
pub struct LoggerCache {
    factory: Arc<dyn LoggerFactory>,
    loggers: RwLock<HashMap<String, SharedLogger>>,
}

impl LoggerCache {
    pub fn new(factory: Arc<dyn LoggerFactory>) -> Self {
        Self {
            factory,
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// Logger for `name`, created on first use
    pub fn get(&self, name: &str) -> SharedLogger {
        if let Some(logger) = self.loggers.read().get(name) {
            return Arc::clone(logger);
        }

        let mut loggers = self.loggers.write();
        let logger = loggers
            .entry(name.to_string())
            .or_insert_with(|| self.factory.get_logger(name));
        Arc::clone(logger)
    }

    /// Number of loggers resolved so far
    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }
}

impl std::fmt::Debug for LoggerCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerCache")
            .field("loggers", &self.loggers.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
