//! Logging sinks the interceptor writes to

mod cache;
mod console;
mod memory;
mod noop;
mod tracing_logger;
mod traits;

pub use cache::LoggerCache;
pub use console::{ConsoleLogger, ConsoleLoggerFactory};
pub use memory::{CapturedRecord, MemoryLogger, MemoryLoggerFactory};
pub use noop::{NoOpLogger, NoOpLoggerFactory};
pub use tracing_logger::{init_tracing, TracingLogger, TracingLoggerFactory};
pub use traits::{Logger, LoggerFactory, LoggingError, LoggingResult, SharedLogger};
