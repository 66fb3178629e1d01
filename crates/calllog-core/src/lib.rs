//! calllog core
//!
//! Method-level call logging for application layers. Calls on watched types
//! (controllers, services, components and configuration holders) are wrapped
//! in an envelope that logs when they start, what they returned or raised,
//! and how long they took. The wrapped code is unaware of the logging and its
//! outcome is returned unchanged.
//!
//! ## Interception
//!
//! ```rust
//! use std::sync::Arc;
//! use calllog_core::{call_context, CallInterceptor, CategoryRegistry, Category};
//! use calllog_core::logging::MemoryLoggerFactory;
//!
//! struct UserService;
//!
//! let mut registry = CategoryRegistry::new();
//! registry.register::<UserService>(Category::Service);
//!
//! let records = MemoryLoggerFactory::new();
//! let interceptor = CallInterceptor::new(registry, Arc::new(records.clone()));
//!
//! let id = 42;
//! let call = call_context!(UserService, "find", id);
//! let name = interceptor.intercept(&call, || Ok::<_, std::io::Error>("ann"));
//!
//! assert_eq!(name.unwrap(), "ann");
//! assert_eq!(records.messages()[0], "Started find [id=42]");
//! ```
//!
//! Records go to a [`Logger`] resolved once per target type through a
//! [`LoggerFactory`]: console, `tracing`, in-memory or no-op.

pub mod category;
pub mod config;
pub mod interceptor;
pub mod logging;
pub mod severity;
pub mod types;

// Re-export commonly used types
pub use types::{
    CallArgs, CallContext, Category, CategorySet, Criticality, LogRecord, Severity, TargetType,
};

pub use category::{CategoryMatcher, CategoryRegistry, Watched};

pub use interceptor::{CallCancelled, CallInterceptor, CallPanicked, Intercepted, Stopwatch};

pub use logging::{
    ConsoleLogger, Logger, LoggerFactory, MemoryLoggerFactory, NoOpLogger, SharedLogger,
    TracingLogger,
};

pub use severity::{AlwaysCritical, SeverityPolicy};

pub use config::{ConfigError, ConfigResult, InterceptorConfig, SinkKind};
