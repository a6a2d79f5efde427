//! Negamax alpha-beta search.

use ferz_core::{Board, Move, legal_moves};

use crate::eval::{Weights, evaluate_with};
use crate::search::control::SearchControl;
use crate::search::ordering::MovePicker;
use crate::search::tt::{Bound, TranspositionTable};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 1_000_000;

/// Base score for checkmate (adjusted by ply for mate distance).
pub const MATE_SCORE: i32 = 999_900;

/// Maximum search depth (in plies).
pub const MAX_PLY: u8 = 128;

/// Scores above this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

/// Search state threaded through negamax calls.
pub(super) struct SearchContext<'a> {
    /// Total nodes visited.
    pub nodes: u64,
    /// Transposition table, owned by the searcher for the whole search.
    pub tt: &'a mut TranspositionTable,
    /// Evaluation weights.
    pub weights: &'a Weights,
    /// Search control (stop flag + time budget).
    pub control: &'a SearchControl,
    /// Set once the current depth has been cut short; its results are void.
    pub aborted: bool,
    /// Best root move of the depth in progress.
    pub root_best: Option<Move>,
}

/// Negamax alpha-beta search.
///
/// Returns the best score for the side to move. Once `ctx.aborted` is set
/// the return value is meaningless and nothing more is written to the table.
pub(super) fn negamax(
    board: &Board,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.nodes += 1;

    if ctx.control.should_stop(ctx.nodes) {
        ctx.aborted = true;
        return 0;
    }

    let side = board.side_to_move();

    if depth == 0 || ply >= MAX_PLY {
        return evaluate_with(board, ctx.weights) * side.sign();
    }

    let key = board.hash();
    let mut tt_move = None;
    if let Some(hit) = ctx.tt.probe(key, ply, side) {
        tt_move = hit.best_move;
        // The root always searches, so it always produces a move.
        if ply > 0 && hit.depth >= depth {
            let cutoff = match hit.bound {
                Bound::Exact => true,
                Bound::LowerBound => hit.score >= beta,
                Bound::UpperBound => hit.score <= alpha,
            };
            if cutoff {
                return hit.score;
            }
        }
    }

    let moves = legal_moves(board);

    // No legal moves: checkmate or stalemate
    if moves.is_empty() {
        return if board.is_in_check(side) {
            -(MATE_SCORE - ply as i32)
        } else {
            0
        };
    }

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = None;
    let mut picker = MovePicker::new(&moves, board, tt_move);

    while let Some(mv) = picker.pick_next() {
        let child = board.make_move(mv);
        let score = -negamax(&child, depth - 1, ply + 1, -beta, -alpha, ctx);

        if ctx.aborted {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            if ply == 0 {
                ctx.root_best = Some(mv);
            }
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        Bound::UpperBound
    } else if best_score >= beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };

    let store_move = if bound == Bound::UpperBound { tt_move.or(best_move) } else { best_move };
    ctx.tt.store(key, depth, best_score, store_move, bound, ply, side);

    best_score
}
