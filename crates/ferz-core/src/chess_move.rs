//! Move records.

use std::fmt;

use crate::piece_kind::PieceKind;
use crate::square::Square;

/// A move from one square to another, with an optional promotion piece.
///
/// Carries no reference to any board. Whether it is a castle is derived from
/// the board it is played on (a king travelling two files).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Create a quiet move or capture.
    pub const fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Create a promotion move.
    pub const fn new_promotion(from: Square, to: Square, piece: PieceKind) -> Move {
        Move {
            from,
            to,
            promotion: Some(piece),
        }
    }

    /// Source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Promotion piece, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    /// Return `true` if this move carries a promotion piece.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Parse a coordinate move such as `"e2e4"` or `"e7e8q"`.
    pub fn from_coords(s: &str) -> Option<Move> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return None;
        }
        let from = Square::from_coord(&s[0..2])?;
        let to = Square::from_coord(&s[2..4])?;
        match s[4..].chars().next() {
            None => Some(Move::new(from, to)),
            Some(c) => {
                let kind = PieceKind::from_fen_char(c)?;
                Some(Move::new_promotion(from, to, kind))
            }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}
