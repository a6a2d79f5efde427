//! Static evaluation: material, center, mobility, and king exposure.
//!
//! Every term is computed from White's perspective. The search negates the
//! total for Black.

pub mod center;
pub mod king_safety;
pub mod material;
pub mod mobility;

use ferz_core::Board;

use center::center_control;
use king_safety::king_safety;
use material::material;
use mobility::mobility;

/// Tunable positional weights, all in centipawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    /// Bonus per piece standing on d4, e4, d5, or e5.
    pub center: i32,
    /// Bonus per pseudo-legal move.
    pub mobility: i32,
    /// Penalty per empty square next to the king.
    pub king_exposure: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            center: 10,
            mobility: 10,
            king_exposure: 5,
        }
    }
}

/// Evaluate with the default [`Weights`]. Positive favors White.
pub fn evaluate(board: &Board) -> i32 {
    evaluate_with(board, &Weights::default())
}

/// Evaluate with explicit weights. Positive favors White.
pub fn evaluate_with(board: &Board, weights: &Weights) -> i32 {
    material(board)
        + weights.center * center_control(board)
        + weights.mobility * mobility(board)
        + weights.king_exposure * king_safety(board)
}
