//! Text driver errors.

use ferz_core::FenError;
use ferz_engine::ParseDifficultyError;

/// Errors that can occur while reading and running driver commands.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    /// A command is missing a required argument.
    #[error("{command}: missing argument")]
    MissingArgument {
        /// The command that was incomplete.
        command: &'static str,
    },

    /// A square name could not be parsed.
    #[error("invalid square: {square}")]
    InvalidSquare {
        /// The rejected square text.
        square: String,
    },

    /// A coordinate move could not be parsed or is not legal.
    #[error("invalid move: {mv}")]
    InvalidMove {
        /// The rejected move text.
        mv: String,
    },

    /// Failed to parse a FEN string.
    #[error("invalid FEN \"{fen}\": {source}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        /// Why it failed.
        source: FenError,
    },

    /// A numeric argument could not be parsed.
    #[error("invalid {param}: {value}")]
    InvalidNumber {
        /// Which argument.
        param: &'static str,
        /// The rejected text.
        value: String,
    },

    /// A numeric argument parsed but lies outside its accepted range.
    #[error("{param} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Which argument.
        param: &'static str,
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// `set` named an unknown setting.
    #[error("unknown setting: {name}")]
    UnknownSetting {
        /// The rejected setting name.
        name: String,
    },

    /// The difficulty name is not recognised.
    #[error(transparent)]
    Difficulty(#[from] ParseDifficultyError),

    /// An I/O error occurred while writing output.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = PlayError::InvalidNumber {
            param: "depth",
            value: "x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid depth: x");
        let err = PlayError::MissingArgument { command: "moves" };
        assert_eq!(err.to_string(), "moves: missing argument");
        let err = PlayError::OutOfRange {
            param: "hash",
            value: 0,
            min: 1,
            max: 65536,
        };
        assert_eq!(err.to_string(), "hash must be between 1 and 65536, got 0");
    }

    #[test]
    fn fen_error_is_source() {
        let source = "bad".parse::<ferz_core::Board>().unwrap_err();
        let err = PlayError::InvalidFen {
            fen: "bad".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
