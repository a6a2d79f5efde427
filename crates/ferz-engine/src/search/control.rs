//! Search control: stop flag and wall-clock budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Controls when a search should stop.
///
/// The stop flag is read at every node. The clock is read every 1024 nodes
/// and before each new iterative-deepening depth. Two modes:
/// - **Infinite**: no budget, only the external stop flag ends the search
/// - **Timed**: the clock starts at construction
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    budget: Option<Duration>,
}

impl SearchControl {
    /// Create control without a time budget.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            budget: None,
        }
    }

    /// Create control with a wall-clock budget; the clock starts now.
    pub fn new_timed(stopped: Arc<AtomicBool>, budget: Duration) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            budget: Some(budget),
        }
    }

    /// Check whether the search should abort immediately.
    ///
    /// Returns `true` if the stop flag is set, or (every 1024 nodes) if the
    /// budget has run out. An expired budget raises the stop flag, so later
    /// calls return without reading the clock.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if nodes & 1023 != 0 {
            return false;
        }

        self.check_budget()
    }

    /// Check whether iterative deepening may start another depth.
    pub fn should_stop_iterating(&self) -> bool {
        self.stopped.load(Ordering::Relaxed) || self.check_budget()
    }

    /// Raise the stop flag.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Return `true` once the stop flag has been raised.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Elapsed time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn check_budget(&self) -> bool {
        match self.budget {
            Some(budget) if self.elapsed() >= budget => {
                self.stop();
                true
            }
            _ => false,
        }
    }
}
