//! Search algorithms and move ordering.

pub mod control;
pub mod negamax;
pub mod ordering;
pub mod tt;

use ferz_core::{Board, Move};
use tracing::debug;

use crate::eval::Weights;
use control::SearchControl;
use negamax::{INF, MATE_THRESHOLD, SearchContext, negamax};
use tt::TranspositionTable;

/// Result of a search: the deepest depth that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move at the deepest completed depth. `None` if no depth
    /// completed or the side to move has no legal move.
    pub best_move: Option<Move>,
    /// Score in centipawns from White's perspective.
    pub score: i32,
    /// Depth reached (0 if none completed).
    pub depth: u8,
    /// Total nodes visited, aborted depth included.
    pub nodes: u64,
}

/// Iterative-deepening searcher with transposition table.
pub struct Searcher {
    tt: TranspositionTable,
    weights: Weights,
}

impl Searcher {
    /// Create a searcher with a `hash_mb` megabyte table.
    pub fn new(hash_mb: usize, weights: Weights) -> Self {
        Self {
            tt: TranspositionTable::new(hash_mb),
            weights,
        }
    }

    /// Clear the transposition table (preserving the allocation).
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Resize the transposition table to the given size in megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Evaluation weights used at the leaves.
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Replace the evaluation weights.
    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    /// The transposition table.
    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Run iterative-deepening search up to `max_depth`.
    ///
    /// Calls `on_iter(depth, score, nodes, best_move)` after each completed
    /// depth, with the score from White's perspective. A depth interrupted
    /// by `control` is thrown away and the previous one stands.
    pub fn search<F>(
        &mut self,
        board: &Board,
        max_depth: u8,
        control: &SearchControl,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, u64, Move),
    {
        let sign = board.side_to_move().sign();
        let mut ctx = SearchContext {
            nodes: 0,
            tt: &mut self.tt,
            weights: &self.weights,
            control,
            aborted: false,
            root_best: None,
        };

        let mut completed = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
        };

        for depth in 1..=max_depth {
            if control.should_stop_iterating() {
                break;
            }

            ctx.aborted = false;
            ctx.root_best = None;
            let score = negamax(board, depth, 0, -INF, INF, &mut ctx);

            if ctx.aborted {
                debug!(depth, nodes = ctx.nodes, "depth aborted");
                break;
            }

            completed.best_move = ctx.root_best;
            completed.score = score * sign;
            completed.depth = depth;
            debug!(
                depth,
                score = completed.score,
                nodes = ctx.nodes,
                best = ?completed.best_move,
                "depth complete"
            );

            let Some(best) = ctx.root_best else {
                // No legal move at the root; deeper searches change nothing.
                break;
            };
            on_iter(depth, completed.score, ctx.nodes, best);

            if score.abs() > MATE_THRESHOLD {
                break;
            }
        }

        completed.nodes = ctx.nodes;
        completed
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .field("weights", &self.weights)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(16, Weights::default())
    }
}
