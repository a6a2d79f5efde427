//! Pseudo-legal and legal move generation.

mod king;
mod knights;
mod pawns;
mod sliders;

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use self::king::gen_king;
use self::knights::gen_knights;
use self::pawns::gen_pawns;
use self::sliders::gen_sliders;

/// Stack-allocated buffer for generated moves. Capacity 256 covers the theoretical max of 218.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; 256],
    len: u16,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::new(Square::A1, Square::A1); 256],
            len: 0,
        }
    }

    /// Push a move onto the list.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < 256);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    /// Return the number of moves in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Return `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Return `true` if `mv` is in the list.
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// Keep only the moves for which `keep` returns `true`, preserving order.
    fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len as usize {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write as u16;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Append the pseudo-legal moves of the piece on `from` to `list`.
///
/// The piece moves for its own color, whoever is to move on `board`.
fn gen_piece(board: &Board, from: Square, list: &mut MoveList) {
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    let color = piece.color();
    match piece.kind() {
        PieceKind::Pawn => gen_pawns(board, from, color, list),
        PieceKind::Knight => gen_knights(board, from, color, list),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            gen_sliders(board, from, piece.kind(), color, list)
        }
        PieceKind::King => gen_king(board, from, color, list),
    }
}

/// Return `true` if playing `mv` leaves the mover's own king safe.
fn keeps_king_safe(board: &Board, mv: Move, mover: Color) -> bool {
    !board.make_move(mv).is_in_check(mover)
}

/// Moves of the piece on `from`.
///
/// With `ignore_check` the list is pseudo-legal; otherwise every move that
/// leaves the mover's king in check is dropped. Empty for an empty square.
pub fn moves_from(board: &Board, from: Square, ignore_check: bool) -> MoveList {
    let mut list = MoveList::new();
    gen_piece(board, from, &mut list);
    if !ignore_check
        && let Some(mover) = board.color_at(from)
    {
        list.retain(|mv| keeps_king_safe(board, mv, mover));
    }
    list
}

/// Destination squares of the piece on `from`, in ascending square order.
pub fn moves_for(board: &Board, from: Square, ignore_check: bool) -> Vec<Square> {
    let mut targets: Vec<Square> = moves_from(board, from, ignore_check)
        .as_slice()
        .iter()
        .map(|mv| mv.to())
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}

/// Every move for `color`'s pieces, pseudo-legal when `ignore_check` is set.
pub fn generate_moves(board: &Board, color: Color, ignore_check: bool) -> MoveList {
    let mut list = MoveList::new();
    for sq in Square::all() {
        if board.color_at(sq) == Some(color) {
            gen_piece(board, sq, &mut list);
        }
    }
    if !ignore_check {
        list.retain(|mv| keeps_king_safe(board, mv, color));
    }
    list
}

/// Legal moves for the side to move.
pub fn legal_moves(board: &Board) -> MoveList {
    generate_moves(board, board.side_to_move(), false)
}
