//! Monotonic timing around a wrapped call

use std::time::{Duration, Instant};

/// Measures wall-clock time since it was started
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole milliseconds since start
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed().as_millis()
    }
}
