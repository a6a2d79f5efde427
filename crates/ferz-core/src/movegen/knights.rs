//! Knight move generation.

use crate::attacks::KNIGHT_OFFSETS;
use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::square::Square;

use super::MoveList;

/// Push a move from `from` to every offset square that is on the board and
/// not held by a `color` piece. Shared by knights and the king.
pub(super) fn gen_steps(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    list: &mut MoveList,
) {
    for &(dr, df) in offsets {
        if let Some(to) = from.offset(dr, df)
            && board.color_at(to) != Some(color)
        {
            list.push(Move::new(from, to));
        }
    }
}

/// Generate pseudo-legal moves for the `color` knight on `from`.
pub(super) fn gen_knights(board: &Board, from: Square, color: Color, list: &mut MoveList) {
    gen_steps(board, from, color, &KNIGHT_OFFSETS, list);
}
