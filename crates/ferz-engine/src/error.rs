//! Game controller errors.

use ferz_core::{GameStatus, Move};

/// Errors returned by [`Game`](crate::game::Game) operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The move is not in the legal-move set of the current position.
    #[error("illegal move: {mv}")]
    IllegalMove {
        /// The rejected move.
        mv: Move,
    },

    /// An AI move is being computed; the board is frozen until it lands.
    #[error("an AI move is still pending")]
    AiPending,

    /// The game has already ended.
    #[error("game is over: {status}")]
    GameOver {
        /// How the game ended.
        status: GameStatus,
    },

    /// The AI worker thread could not be started.
    #[error("failed to spawn AI worker: {source}")]
    Spawn {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferz_core::{Color, Square};

    #[test]
    fn display() {
        let err = GameError::IllegalMove {
            mv: Move::new(Square::E2, Square::E5),
        };
        assert_eq!(err.to_string(), "illegal move: e2e5");

        let err = GameError::GameOver {
            status: GameStatus::Checkmate {
                winner: Color::Black,
            },
        };
        assert_eq!(err.to_string(), "game is over: checkmate, black wins");
    }

    #[test]
    fn spawn_wraps_io_error() {
        let io = std::io::Error::other("no threads");
        let err: GameError = io.into();
        assert!(matches!(err, GameError::Spawn { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }
}
