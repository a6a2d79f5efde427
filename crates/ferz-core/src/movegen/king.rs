//! King move generation, including castling.

use crate::attacks::KING_OFFSETS;
use crate::board::Board;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::MoveList;
use super::knights::gen_steps;

/// File of the king's home square.
const KING_HOME_FILE: u8 = 4;

/// Generate pseudo-legal moves for the `color` king on `from`, castles included.
pub(super) fn gen_king(board: &Board, from: Square, color: Color, list: &mut MoveList) {
    gen_steps(board, from, color, &KING_OFFSETS, list);
    gen_castling(board, from, color, list);
}

/// Push every castle currently available to `color`.
///
/// Castling through or out of check is never allowed, so the attack tests
/// run here regardless of whether the caller filters for legality.
fn gen_castling(board: &Board, from: Square, color: Color, list: &mut MoveList) {
    let rank = color.back_rank();
    if from.rank() != rank || from.file() != KING_HOME_FILE {
        return;
    }
    let enemy = color.flip();
    if board.is_square_attacked(from, enemy) {
        return;
    }

    for side in CastleSide::ALL {
        if !board.castling().has(color, side) {
            continue;
        }
        let rook_sq = side.rook_home(color);
        if board.piece_at(rook_sq) != Some(Piece::new(PieceKind::Rook, color)) {
            continue;
        }

        let (low, high) = if rook_sq.file() < from.file() {
            (rook_sq.file() + 1, from.file())
        } else {
            (from.file() + 1, rook_sq.file())
        };
        let path_clear = (low..high)
            .filter_map(|file| Square::new(rank, file))
            .all(|sq| !board.is_occupied(sq));
        if !path_clear {
            continue;
        }

        let Some(pass) = Square::new(rank, side.rook_dest_file()) else {
            continue;
        };
        let Some(dest) = Square::new(rank, side.king_dest_file()) else {
            continue;
        };
        if board.is_square_attacked(pass, enemy) || board.is_square_attacked(dest, enemy) {
            continue;
        }

        list.push(Move::new(from, dest));
    }
}
