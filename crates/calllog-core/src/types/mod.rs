//! Core types for call logging

mod call;
mod category;
mod record;

pub use call::{simple_type_name, CallArgs, CallContext, TargetType};
pub(crate) use call::to_log_value;
pub use category::{Category, CategorySet};
pub use record::{Criticality, LogRecord, Severity};
