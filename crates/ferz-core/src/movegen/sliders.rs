//! Bishop, rook, and queen move generation by ray casting.

use crate::attacks::{BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::MoveList;

/// Walk each ray from `from` until the edge or the first occupied square,
/// which is included only when it holds an enemy piece.
fn gen_rays(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    list: &mut MoveList,
) {
    for &(dr, df) in directions {
        let mut cursor = from.offset(dr, df);
        while let Some(to) = cursor {
            match board.color_at(to) {
                None => list.push(Move::new(from, to)),
                Some(c) => {
                    if c != color {
                        list.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cursor = to.offset(dr, df);
        }
    }
}

/// Generate pseudo-legal moves for the `color` slider of `kind` on `from`.
pub(super) fn gen_sliders(
    board: &Board,
    from: Square,
    kind: PieceKind,
    color: Color,
    list: &mut MoveList,
) {
    if matches!(kind, PieceKind::Rook | PieceKind::Queen) {
        gen_rays(board, from, color, &ROOK_DIRECTIONS, list);
    }
    if matches!(kind, PieceKind::Bishop | PieceKind::Queen) {
        gen_rays(board, from, color, &BISHOP_DIRECTIONS, list);
    }
}
