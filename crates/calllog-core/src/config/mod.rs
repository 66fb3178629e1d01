//! Interceptor configuration
//!
//! A YAML file selects the logging sink and lists the watched types:
//!
//! ```yaml
//! sink: console
//! console_prefix: "[shop]"
//! types:
//!   - name: "shop::OrderController"
//!     categories: [controller]
//! ```

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::{InterceptorConfig, SinkKind, TypeRegistration};
