//! Terminal-state detection: checkmate and stalemate.

use std::fmt;

use crate::board::Board;
use crate::color::Color;
use crate::movegen::generate_moves;

/// Where a position stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    Ongoing,
    /// The side to move is checkmated.
    Checkmate {
        /// The side that delivered mate.
        winner: Color,
    },
    /// The side to move has no legal move and is not in check.
    Stalemate,
}

impl GameStatus {
    /// Return `true` for checkmate or stalemate.
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            GameStatus::Stalemate => write!(f, "stalemate"),
        }
    }
}

impl Board {
    /// Return `true` if `color` has at least one legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        !generate_moves(self, color, false).is_empty()
    }

    /// `color` is in check and has no legal move.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// `color` is not in check and has no legal move.
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Status for the side to move.
    pub fn status(&self) -> GameStatus {
        let side = self.side_to_move();
        if self.has_legal_move(side) {
            GameStatus::Ongoing
        } else if self.is_in_check(side) {
            GameStatus::Checkmate {
                winner: side.flip(),
            }
        } else {
            GameStatus::Stalemate
        }
    }
}
