//! Pawn move generation: single push, double push, diagonal captures, queen promotion.

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::MoveList;

/// Push a pawn move, turning it into a queen promotion on the last rank.
fn push_pawn_move(from: Square, to: Square, color: Color, list: &mut MoveList) {
    if to.rank() == color.promotion_rank() {
        list.push(Move::new_promotion(from, to, PieceKind::Queen));
    } else {
        list.push(Move::new(from, to));
    }
}

/// Generate pseudo-legal moves for the `color` pawn on `from`. No en passant.
pub(super) fn gen_pawns(board: &Board, from: Square, color: Color, list: &mut MoveList) {
    let forward = color.forward();

    if let Some(one) = from.offset(forward, 0)
        && !board.is_occupied(one)
    {
        push_pawn_move(from, one, color, list);

        if from.rank() == color.pawn_rank()
            && let Some(two) = one.offset(forward, 0)
            && !board.is_occupied(two)
        {
            list.push(Move::new(from, two));
        }
    }

    for side in [-1, 1] {
        if let Some(target) = from.offset(forward, side)
            && board.color_at(target) == Some(color.flip())
        {
            push_pawn_move(from, target, color, list);
        }
    }
}
