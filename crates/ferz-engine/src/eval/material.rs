//! Material balance evaluation.
//!
//! Sums [`PieceKind::value`] over every piece, signed by color. All scores
//! are returned from White's perspective (positive = White ahead).

use ferz_core::Board;

/// Evaluate material balance from White's perspective.
///
/// The king's weight is counted like any other piece, so a hypothetical
/// board with a king missing swamps every positional term.
pub fn material(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, piece)| piece.kind().value() * piece.color().sign())
        .sum()
}
