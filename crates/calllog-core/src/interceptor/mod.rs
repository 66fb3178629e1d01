//! Call interception: the timing envelope, message rendering and the decorator
//!
//! ```text
//! intercept(call, proceed)
//!     → matcher: target watched?      no → proceed() untouched, args never rendered
//!     → logger.info("Started ...")
//!     → stopwatch + proceed()
//!     → Ok:    logger.info("Finished ... in N ms")
//!     → Err:   severity policy → logger.warn/error("Failed ...")
//!     → panic: failure record, then resume
//!     → dropped while awaiting: failure record (CallCancelled)
//! ```

mod decorator;
mod envelope;
pub mod format;
mod timing;

pub use decorator::Intercepted;
pub use envelope::{CallCancelled, CallInterceptor, CallPanicked};
pub use timing::Stopwatch;
