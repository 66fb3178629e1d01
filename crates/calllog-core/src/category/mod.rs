//! Category membership: which types have their calls logged
//!
//! - `Watched`: static tag a type implements to declare its categories
//! - `CategoryRegistry`: registration table filled at startup
//! - `CategoryMatcher`: pure lookup used by the interceptor

mod matcher;
mod registry;

pub use matcher::CategoryMatcher;
pub use registry::{CategoryRegistry, Watched};
