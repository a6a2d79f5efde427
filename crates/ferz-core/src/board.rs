//! The chess board: piece placement, side to move, castling rights, and king cache.

use std::fmt;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Back-rank piece order from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Complete position state.
///
/// The board is a flat 64-cell array, so cloning is a single memcpy and
/// search can explore hypothetical moves on private copies.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Piece on each square, indexed by [`Square::index()`].
    cells: [Option<Piece>; Square::COUNT],
    /// Which side moves next.
    side_to_move: Color,
    /// Current castling rights.
    castling: CastleRights,
    /// Cached king location per side, indexed by [`Color::index()`].
    kings: [Option<Square>; Color::COUNT],
}

impl Board {
    /// Return a board with no pieces, White to move, and no castling rights.
    pub fn empty() -> Board {
        Board {
            cells: [None; Square::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            kings: [None; Color::COUNT],
        }
    }

    /// Return the standard starting position.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for color in Color::ALL {
            for (file, kind) in BACK_RANK.into_iter().enumerate() {
                if let Some(sq) = Square::new(color.back_rank(), file as u8) {
                    board.place(sq, Piece::new(kind, color));
                }
                if let Some(sq) = Square::new(color.pawn_rank(), file as u8) {
                    board.place(sq, Piece::new(PieceKind::Pawn, color));
                }
            }
        }
        board.castling = CastleRights::ALL;
        board
    }

    /// Return the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    /// Return the color of the piece on the given square, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.cells[sq.index()].map(Piece::color)
    }

    /// Return `true` if the given square holds a piece.
    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_some()
    }

    /// Put `piece` on `sq`, returning whatever stood there before.
    pub fn place(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let previous = self.remove(sq);
        self.cells[sq.index()] = Some(piece);
        if piece.kind() == PieceKind::King {
            self.kings[piece.color().index()] = Some(sq);
        }
        previous
    }

    /// Clear `sq`, returning the piece that stood there.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let previous = self.cells[sq.index()].take();
        if let Some(piece) = previous
            && piece.kind() == PieceKind::King
            && self.kings[piece.color().index()] == Some(sq)
        {
            self.kings[piece.color().index()] = None;
        }
        previous
    }

    /// Iterate over every occupied square with its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Return the square of the king for the given side.
    ///
    /// `None` only on hypothetical boards reached during look-ahead or
    /// hand-built test positions.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// Overwrite the king cache with a saved copy.
    #[inline]
    pub(crate) fn restore_kings(&mut self, kings: [Option<Square>; Color::COUNT]) {
        self.kings = kings;
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Set the side to move.
    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Return the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Set the castling rights.
    #[inline]
    pub fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    /// Zobrist key of the piece placement and side to move.
    ///
    /// Castling rights are not part of the key: two boards with the same
    /// cells and the same side to move share a transposition entry.
    pub fn hash(&self) -> u64 {
        zobrist::hash_from_scratch(self)
    }

    /// Return `true` if moving from `from` to `to` castles: a king travelling two files.
    pub fn is_castle(&self, from: Square, to: Square) -> bool {
        matches!(self.piece_at(from), Some(p) if p.kind() == PieceKind::King)
            && from.rank() == to.rank()
            && from.file().abs_diff(to.file()) == 2
    }

    /// Validate the structural integrity of the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let king_count = self
                .pieces()
                .filter(|(_, p)| p.is(PieceKind::King, color))
                .count() as u32;
            if king_count != 1 {
                return Err(BoardError::InvalidKingCount {
                    color: color.name(),
                    count: king_count,
                });
            }
        }

        let pawn_on_back_rank = self
            .pieces()
            .any(|(sq, p)| p.kind() == PieceKind::Pawn && (sq.rank() == 0 || sq.rank() == 7));
        if pawn_on_back_rank {
            return Err(BoardError::PawnsOnBackRank);
        }

        let waiting = self.side_to_move.flip();
        if self.is_in_check(waiting) {
            return Err(BoardError::OpponentInCheck {
                color: waiting.name(),
            });
        }

        Ok(())
    }

    /// Return a pretty-printable wrapper for this board.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", self)
    }
}

/// Wrapper for pretty-printing a board as an 8x8 grid.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let c = Square::new(rank, file)
                    .and_then(|sq| board.piece_at(sq))
                    .map_or('.', Piece::fen_char);
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::castle_rights::CastleRights;
    use crate::color::Color;
    use crate::error::BoardError;
    use crate::piece::Piece;
    use crate::square::Square;

    #[test]
    fn starting_position_validates() {
        let board = Board::starting_position();
        board.validate().unwrap();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.castling(), CastleRights::ALL);
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn starting_position_piece_at() {
        let board = Board::starting_position();
        assert_eq!(board.piece_at(Square::E1), Some(Piece::WHITE_KING));
        assert_eq!(board.piece_at(Square::D1), Some(Piece::WHITE_QUEEN));
        assert_eq!(board.piece_at(Square::B8), Some(Piece::BLACK_KNIGHT));
        assert_eq!(board.piece_at(Square::H7), Some(Piece::BLACK_PAWN));
        assert_eq!(board.piece_at(Square::E4), None);
        assert_eq!(board.color_at(Square::E8), Some(Color::Black));
    }

    #[test]
    fn king_cache_follows_place_and_remove() {
        let mut board = Board::starting_position();
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));

        let king = board.remove(Square::E1);
        assert_eq!(king, Some(Piece::WHITE_KING));
        assert_eq!(board.king_square(Color::White), None);

        board.place(Square::E4, Piece::WHITE_KING);
        assert_eq!(board.king_square(Color::White), Some(Square::E4));
    }

    #[test]
    fn place_returns_previous_occupant() {
        let mut board = Board::empty();
        assert_eq!(board.place(Square::D4, Piece::WHITE_ROOK), None);
        assert_eq!(board.place(Square::D4, Piece::BLACK_QUEEN), Some(Piece::WHITE_ROOK));
        assert!(board.is_occupied(Square::D4));
        assert_eq!(board.remove(Square::D4), Some(Piece::BLACK_QUEEN));
        assert!(!board.is_occupied(Square::D4));
    }

    #[test]
    fn copy_is_independent() {
        let board = Board::starting_position();
        let mut copy = board;
        copy.remove(Square::E2);
        assert!(board.is_occupied(Square::E2));
        assert!(!copy.is_occupied(Square::E2));
    }

    #[test]
    fn validate_rejects_missing_king() {
        let mut board = Board::starting_position();
        board.remove(Square::E8);
        assert_eq!(
            board.validate(),
            Err(BoardError::InvalidKingCount {
                color: "black",
                count: 0
            })
        );
    }

    #[test]
    fn detects_castle_shape() {
        let board = Board::starting_position();
        assert!(board.is_castle(Square::E1, Square::G1));
        assert!(board.is_castle(Square::E1, Square::C1));
        assert!(!board.is_castle(Square::E1, Square::F1));
        assert!(!board.is_castle(Square::D1, Square::F1));
    }

    #[test]
    fn pretty_print() {
        let board = Board::starting_position();
        let output = format!("{}", board.pretty());
        assert!(output.contains("r n b q k b n r"));
        assert!(output.contains("R N B Q K B N R"));
        assert!(output.contains("a b c d e f g h"));
    }
}
