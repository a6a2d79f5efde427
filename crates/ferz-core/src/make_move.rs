//! Move execution: copy-make for search, make/unmake with an undo record for perft.

use crate::board::Board;
use crate::castle_rights::{CastleRights, CastleSide};
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Maps each square index to the castling rights that must be removed when
/// that square is the source or destination of any move.
const CASTLE_RIGHTS_REVOKE: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::A1.index()] = CastleRights::WHITE_QUEEN;
    table[Square::H1.index()] = CastleRights::WHITE_KING;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::A8.index()] = CastleRights::BLACK_QUEEN;
    table[Square::H8.index()] = CastleRights::BLACK_KING;
    table
};

/// State needed to take back a move played with [`Board::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    moved: Option<Piece>,
    captured: Option<Piece>,
    rook_shift: Option<(Square, Square)>,
    castling: CastleRights,
    side_to_move: Color,
    kings: [Option<Square>; Color::COUNT],
}

impl Undo {
    /// The piece that stood on the destination before the move, if any.
    #[inline]
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

/// Rook relocation `(from, to)` for a `color` king castling onto `king_to`.
fn castle_rook_squares(color: Color, king_to: Square) -> Option<(Square, Square)> {
    let side = if king_to.file() == CastleSide::KingSide.king_dest_file() {
        CastleSide::KingSide
    } else {
        CastleSide::QueenSide
    };
    let rook_to = Square::new(color.back_rank(), side.rook_dest_file())?;
    Some((side.rook_home(color), rook_to))
}

impl Board {
    /// Apply a move and return the resulting board. Copy-make: `self` is not modified.
    ///
    /// An empty source square returns the board unchanged.
    pub fn make_move(&self, mv: Move) -> Board {
        let mut b = *self;
        b.apply_move(mv);
        b
    }

    /// Play `mv` in place and return the record [`Board::unmake_move`] needs.
    ///
    /// The moving piece belongs to whichever side owns the source square. A
    /// pawn landing on its last rank always becomes a queen, whatever the
    /// move asks for. The side to move is flipped.
    pub fn apply_move(&mut self, mv: Move) -> Undo {
        let from = mv.from();
        let to = mv.to();

        let mut undo = Undo {
            moved: self.piece_at(from),
            captured: self.piece_at(to),
            rook_shift: None,
            castling: self.castling(),
            side_to_move: self.side_to_move(),
            kings: [self.king_square(Color::White), self.king_square(Color::Black)],
        };
        let Some(moved) = undo.moved else {
            return undo;
        };

        let is_castle = self.is_castle(from, to);
        let color = moved.color();

        self.remove(from);
        let placed = if moved.kind() == PieceKind::Pawn && to.rank() == color.promotion_rank() {
            Piece::new(PieceKind::Queen, color)
        } else {
            moved
        };
        self.place(to, placed);

        if is_castle
            && let Some((rook_from, rook_to)) = castle_rook_squares(color, to)
            && let Some(rook) = self.remove(rook_from)
        {
            self.place(rook_to, rook);
            undo.rook_shift = Some((rook_from, rook_to));
        }

        let revoked = CASTLE_RIGHTS_REVOKE[from.index()].insert(CASTLE_RIGHTS_REVOKE[to.index()]);
        self.set_castling(self.castling().remove(revoked));
        self.set_side_to_move(self.side_to_move().flip());

        undo
    }

    /// Take back `mv`, which must be the last move played with [`Board::apply_move`].
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let from = mv.from();
        let to = mv.to();

        let Some(moved) = undo.moved else {
            return;
        };

        if let Some((rook_from, rook_to)) = undo.rook_shift
            && let Some(rook) = self.remove(rook_to)
        {
            self.place(rook_from, rook);
        }

        self.remove(to);
        if let Some(captured) = undo.captured {
            self.place(to, captured);
        }
        self.place(from, moved);

        self.set_castling(undo.castling);
        self.set_side_to_move(undo.side_to_move);
        self.restore_kings(undo.kings);
    }
}
