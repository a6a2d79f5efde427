//! Engine configuration knobs, adjustable between moves.

use std::time::Duration;

use crate::eval::Weights;
use crate::search::tt::{MAX_HASH_MB, MIN_HASH_MB};

/// Configuration for the AI and its search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Wall-clock budget for a hard search.
    pub time_budget: Duration,
    /// Deepest iterative-deepening depth for a hard search.
    pub max_depth: u8,
    /// Fixed depth for a medium search.
    pub shallow_depth: u8,
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Evaluator weights.
    pub weights: Weights,
}

impl EngineConfig {
    /// Return this config with a different time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Return this config with a different hard-search depth cap.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Return this config with a different medium-search depth.
    pub fn with_shallow_depth(mut self, depth: u8) -> Self {
        self.shallow_depth = depth.max(1);
        self
    }

    /// Return this config with a different table size, clamped to
    /// `1..=65536` megabytes.
    pub fn with_hash_mb(mut self, mb: usize) -> Self {
        self.hash_mb = mb.clamp(MIN_HASH_MB, MAX_HASH_MB);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(2),
            max_depth: 64,
            shallow_depth: 2,
            hash_mb: 16,
            weights: Weights::default(),
        }
    }
}
