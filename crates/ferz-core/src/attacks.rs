//! Attack and check detection.
//!
//! Works by looking outward from the target square, so it never needs the
//! legal-move generator. Legal move generation asks this module whether its
//! own king ends up attacked; if this module in turn generated the
//! opponent's legal moves, the two would recurse into each other forever.

use crate::board::Board;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Knight jumps as (rank, file) deltas.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// King steps as (rank, file) deltas.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Orthogonal ray directions.
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Diagonal ray directions.
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl Board {
    /// Return `true` if `sq` is attacked by any piece of `by_color`.
    ///
    /// Uses reverse lookup: each attack pattern is cast from the target
    /// square and tested against the attacker's pieces of that kind.
    pub fn is_square_attacked(&self, sq: Square, by_color: Color) -> bool {
        let holds = |target: Option<Square>, kinds: &[PieceKind]| {
            target
                .and_then(|t| self.piece_at(t))
                .is_some_and(|p| p.color() == by_color && kinds.contains(&p.kind()))
        };

        // A pawn of `by_color` attacks `sq` from one rank behind it, diagonally.
        let pawn_rank = -by_color.forward();
        if holds(sq.offset(pawn_rank, -1), &[PieceKind::Pawn])
            || holds(sq.offset(pawn_rank, 1), &[PieceKind::Pawn])
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, df)| holds(sq.offset(dr, df), &[PieceKind::Knight]))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(dr, df)| holds(sq.offset(dr, df), &[PieceKind::King]))
        {
            return true;
        }

        let orthogonal = [PieceKind::Rook, PieceKind::Queen];
        if ROOK_DIRECTIONS
            .iter()
            .any(|&dir| holds(self.first_piece_along(sq, dir), &orthogonal))
        {
            return true;
        }

        let diagonal = [PieceKind::Bishop, PieceKind::Queen];
        BISHOP_DIRECTIONS
            .iter()
            .any(|&dir| holds(self.first_piece_along(sq, dir), &diagonal))
    }

    /// Return `true` if `color`'s king is attacked.
    ///
    /// A side without a king counts as in check. That only happens on boards
    /// built by look-ahead, where failing closed keeps such lines from being
    /// chosen.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king_sq) => self.is_square_attacked(king_sq, color.flip()),
            None => true,
        }
    }

    /// Walk from `from` (exclusive) along `(dr, df)` and return the first occupied square.
    fn first_piece_along(&self, from: Square, (dr, df): (i8, i8)) -> Option<Square> {
        let mut cursor = from.offset(dr, df);
        while let Some(sq) = cursor {
            if self.is_occupied(sq) {
                return Some(sq);
            }
            cursor = sq.offset(dr, df);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::square::Square;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    #[test]
    fn starting_position_attacks() {
        let board = Board::starting_position();
        assert!(board.is_square_attacked(Square::F3, Color::White));
        assert!(board.is_square_attacked(Square::F6, Color::Black));
        assert!(board.is_square_attacked(Square::E2, Color::White));
        assert!(!board.is_square_attacked(Square::E4, Color::White));
        assert!(!board.is_square_attacked(Square::E4, Color::Black));
        assert!(!board.is_in_check(Color::White));
        assert!(!board.is_in_check(Color::Black));
    }

    #[test]
    fn pawn_attacks_point_forward() {
        let mut b = Board::empty();
        b.place(Square::E4, Piece::WHITE_PAWN);
        b.place(Square::D5, Piece::BLACK_PAWN);
        assert!(b.is_square_attacked(Square::D5, Color::White));
        assert!(b.is_square_attacked(Square::F5, Color::White));
        assert!(!b.is_square_attacked(Square::E5, Color::White));
        assert!(!b.is_square_attacked(Square::D3, Color::White));
        assert!(b.is_square_attacked(Square::E4, Color::Black));
        assert!(b.is_square_attacked(Square::C4, Color::Black));
        assert!(!b.is_square_attacked(Square::D6, Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let b = board("4k3/8/8/8/4p3/8/8/4R1K1 w - - 0 1");
        assert!(b.is_square_attacked(Square::E4, Color::White));
        assert!(!b.is_square_attacked(Square::E5, Color::White));
        assert!(!b.is_in_check(Color::Black));

        let b = board("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1");
        assert!(b.is_in_check(Color::Black));
    }

    #[test]
    fn bishop_and_queen_diagonals() {
        let b = board("4k3/8/8/8/8/8/1B6/Q3K3 w - - 0 1");
        assert!(b.is_square_attacked(Square::H8, Color::White));
        assert!(b.is_square_attacked(Square::A8, Color::White));
        assert!(!b.is_square_attacked(Square::C3, Color::Black));
    }

    #[test]
    fn knight_and_king_adjacency() {
        let b = board("4k3/8/8/8/8/5n2/8/4K3 w - - 0 1");
        assert!(b.is_in_check(Color::White));
        assert!(b.is_square_attacked(Square::D2, Color::White));
        assert!(b.is_square_attacked(Square::D7, Color::Black));
    }

    #[test]
    fn missing_king_counts_as_check() {
        let mut b = Board::starting_position();
        b.remove(Square::E8);
        assert!(b.is_in_check(Color::Black));
        assert!(!b.is_in_check(Color::White));
    }
}
