//! Driver command parsing.

use std::time::Duration;

use ferz_core::{Board, Move, PieceKind, STARTING_FEN, Square, legal_moves};
use ferz_engine::{Difficulty, MAX_HASH_MB, MIN_HASH_MB};

use crate::error::PlayError;

/// A runtime-adjustable engine setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// `set budget <ms>` -- hard-search time budget.
    Budget(Duration),
    /// `set depth <n>` -- hard-search depth cap.
    Depth(u8),
    /// `set shallow <n>` -- medium-search depth.
    Shallow(u8),
    /// `set hash <mb>` -- transposition table size.
    Hash(usize),
}

/// A parsed driver command.
#[derive(Debug)]
pub enum Command {
    /// `new` -- back to the starting position.
    New,
    /// `show` -- print the board.
    Show,
    /// `fen` -- print the position as FEN.
    Fen,
    /// `position <fen|startpos> [moves ...]` -- set up a position.
    Position(Board),
    /// `moves <sq>` -- list destinations for the piece on a square.
    Moves(Square),
    /// `move <from><to>[q]` -- play a move.
    Move {
        /// Source square.
        from: Square,
        /// Destination square.
        to: Square,
        /// Requested promotion piece.
        promotion: Option<PieceKind>,
    },
    /// `ai [easy|medium|hard]` -- let the engine move.
    Ai(Difficulty),
    /// `stop` -- cut the AI search short.
    Stop,
    /// `set <name> <value>` -- change an engine setting.
    Set(Setting),
    /// `perft <depth>` -- count leaf nodes from the current position.
    Perft(usize),
    /// `help` -- list commands.
    Help,
    /// `quit` -- exit.
    Quit,
    /// Unrecognized command.
    Unknown(String),
}

/// Parse a single input line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, PlayError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "new" => Ok(Command::New),
        "show" | "d" => Ok(Command::Show),
        "fen" => Ok(Command::Fen),
        "stop" => Ok(Command::Stop),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "moves" => {
            let sq = tokens.get(1).ok_or(PlayError::MissingArgument { command: "moves" })?;
            Ok(Command::Moves(parse_square(sq)?))
        }
        "move" => {
            let mv = tokens.get(1).ok_or(PlayError::MissingArgument { command: "move" })?;
            parse_move(mv)
        }
        "ai" => match tokens.get(1) {
            Some(name) => Ok(Command::Ai(name.parse()?)),
            None => Ok(Command::Ai(Difficulty::default())),
        },
        "set" => parse_set(&tokens[1..]),
        "perft" => {
            let depth = tokens.get(1).ok_or(PlayError::MissingArgument { command: "perft" })?;
            Ok(Command::Perft(parse_number(depth, "depth")?))
        }
        // A bare coordinate move is accepted as shorthand for `move`.
        token if Move::from_coords(token).is_some() => parse_move(token),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

fn parse_square(s: &str) -> Result<Square, PlayError> {
    Square::from_coord(s).ok_or_else(|| PlayError::InvalidSquare {
        square: s.to_string(),
    })
}

fn parse_move(s: &str) -> Result<Command, PlayError> {
    let mv = Move::from_coords(s).ok_or_else(|| PlayError::InvalidMove { mv: s.to_string() })?;
    Ok(Command::Move {
        from: mv.from(),
        to: mv.to(),
        promotion: mv.promotion(),
    })
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 e7e5 ...]`
/// - `position <fen> [moves e2e4 e7e5 ...]` with 4 to 6 FEN fields
fn parse_position(tokens: &[&str]) -> Result<Command, PlayError> {
    if tokens.is_empty() {
        return Err(PlayError::MissingArgument {
            command: "position",
        });
    }

    let split = tokens
        .iter()
        .position(|&t| t == "moves")
        .unwrap_or(tokens.len());
    let (setup, rest) = tokens.split_at(split);

    let fen = match setup {
        ["startpos"] => STARTING_FEN.to_string(),
        _ => setup.join(" "),
    };
    let mut board: Board = fen
        .parse()
        .map_err(|source| PlayError::InvalidFen { fen, source })?;

    // Apply moves if present, each checked against the legal-move set.
    for text in rest.iter().skip(1) {
        let parsed =
            Move::from_coords(text).ok_or_else(|| PlayError::InvalidMove { mv: text.to_string() })?;
        let mv = legal_moves(&board)
            .as_slice()
            .iter()
            .copied()
            .find(|mv| {
                mv.from() == parsed.from()
                    && mv.to() == parsed.to()
                    && (parsed.promotion().is_none() || mv.promotion() == parsed.promotion())
            })
            .ok_or_else(|| PlayError::InvalidMove { mv: text.to_string() })?;
        board = board.make_move(mv);
    }

    Ok(Command::Position(board))
}

/// Parse the `set` command arguments.
fn parse_set(tokens: &[&str]) -> Result<Command, PlayError> {
    let name = tokens.first().ok_or(PlayError::MissingArgument { command: "set" })?;
    let value = tokens.get(1).ok_or(PlayError::MissingArgument { command: "set" })?;

    let setting = match *name {
        "budget" => Setting::Budget(Duration::from_millis(parse_number(value, "budget")?)),
        "depth" => Setting::Depth(parse_number(value, "depth")?),
        "shallow" => Setting::Shallow(parse_number(value, "shallow")?),
        "hash" => Setting::Hash(parse_hash(value)?),
        _ => {
            return Err(PlayError::UnknownSetting {
                name: name.to_string(),
            });
        }
    };
    Ok(Command::Set(setting))
}

/// Parse a table size in megabytes, rejecting sizes outside the engine's range.
fn parse_hash(value: &str) -> Result<usize, PlayError> {
    let mb: usize = parse_number(value, "hash")?;
    if !(MIN_HASH_MB..=MAX_HASH_MB).contains(&mb) {
        return Err(PlayError::OutOfRange {
            param: "hash",
            value: mb,
            min: MIN_HASH_MB,
            max: MAX_HASH_MB,
        });
    }
    Ok(mb)
}

/// Parse a numeric argument.
fn parse_number<T: std::str::FromStr>(value: &str, param: &'static str) -> Result<T, PlayError> {
    value.parse().map_err(|_| PlayError::InvalidNumber {
        param,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferz_core::Color;

    #[test]
    fn parse_simple_commands() {
        assert!(matches!(parse_command("new").unwrap(), Command::New));
        assert!(matches!(parse_command("show").unwrap(), Command::Show));
        assert!(matches!(parse_command("fen").unwrap(), Command::Fen));
        assert!(matches!(parse_command("stop").unwrap(), Command::Stop));
        assert!(matches!(parse_command("quit").unwrap(), Command::Quit));
    }

    #[test]
    fn parse_move_with_and_without_keyword() {
        for line in ["move e2e4", "e2e4"] {
            match parse_command(line).unwrap() {
                Command::Move {
                    from,
                    to,
                    promotion,
                } => {
                    assert_eq!(from, Square::E2);
                    assert_eq!(to, Square::E4);
                    assert_eq!(promotion, None);
                }
                other => panic!("expected Move, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_promotion_move() {
        match parse_command("move b7b8q").unwrap() {
            Command::Move { promotion, .. } => assert_eq!(promotion, Some(PieceKind::Queen)),
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn parse_bad_move() {
        assert!(matches!(
            parse_command("move e9e4"),
            Err(PlayError::InvalidMove { .. })
        ));
        assert!(matches!(
            parse_command("move"),
            Err(PlayError::MissingArgument { command: "move" })
        ));
    }

    #[test]
    fn parse_moves_square() {
        match parse_command("moves g1").unwrap() {
            Command::Moves(sq) => assert_eq!(sq, Square::G1),
            other => panic!("expected Moves, got {other:?}"),
        }
        assert!(matches!(
            parse_command("moves z9"),
            Err(PlayError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn parse_ai_difficulty() {
        assert!(matches!(
            parse_command("ai").unwrap(),
            Command::Ai(Difficulty::Hard)
        ));
        assert!(matches!(
            parse_command("ai easy").unwrap(),
            Command::Ai(Difficulty::Easy)
        ));
        assert!(matches!(
            parse_command("ai brutal"),
            Err(PlayError::Difficulty(_))
        ));
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        match parse_command("position startpos moves e2e4 e7e5 d1h5").unwrap() {
            Command::Position(board) => {
                assert_eq!(board.side_to_move(), Color::Black);
                assert!(board.piece_at(Square::H5).is_some());
            }
            other => panic!("expected Position, got {other:?}"),
        }
    }

    #[test]
    fn parse_position_fen() {
        let cmd = parse_command("position 4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        match cmd {
            Command::Position(board) => assert_eq!(board.to_string(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1"),
            other => panic!("expected Position, got {other:?}"),
        }
    }

    #[test]
    fn parse_position_rejects_illegal_moves() {
        assert!(matches!(
            parse_command("position startpos moves e2e5"),
            Err(PlayError::InvalidMove { .. })
        ));
        assert!(matches!(
            parse_command("position 8/8/8 w - -"),
            Err(PlayError::InvalidFen { .. })
        ));
    }

    #[test]
    fn parse_settings() {
        assert!(matches!(
            parse_command("set budget 500").unwrap(),
            Command::Set(Setting::Budget(d)) if d == Duration::from_millis(500)
        ));
        assert!(matches!(
            parse_command("set depth 6").unwrap(),
            Command::Set(Setting::Depth(6))
        ));
        assert!(matches!(
            parse_command("set shallow 3").unwrap(),
            Command::Set(Setting::Shallow(3))
        ));
        assert!(matches!(
            parse_command("set hash 64").unwrap(),
            Command::Set(Setting::Hash(64))
        ));
        assert!(matches!(
            parse_command("set depth deep"),
            Err(PlayError::InvalidNumber { param: "depth", .. })
        ));
        assert!(matches!(
            parse_command("set colour blue"),
            Err(PlayError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn hash_size_must_be_in_range() {
        assert!(matches!(
            parse_command("set hash 65536").unwrap(),
            Command::Set(Setting::Hash(65536))
        ));
        assert!(matches!(
            parse_command("set hash 18446744073709551615"),
            Err(PlayError::OutOfRange { param: "hash", min: 1, max: 65536, .. })
        ));
        assert!(matches!(
            parse_command("set hash 0"),
            Err(PlayError::OutOfRange { param: "hash", value: 0, .. })
        ));
        assert!(matches!(
            parse_command("set hash 99999999999999999999999"),
            Err(PlayError::InvalidNumber { param: "hash", .. })
        ));
    }

    #[test]
    fn parse_perft() {
        assert!(matches!(parse_command("perft 3").unwrap(), Command::Perft(3)));
    }

    #[test]
    fn parse_unknown() {
        match parse_command("xyzzy").unwrap() {
            Command::Unknown(s) => assert_eq!(s, "xyzzy"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }
}
