//! AI move selection and the background worker that runs it.
//!
//! The worker owns a snapshot of the board and the [`Searcher`] for the
//! duration of one move, then hands both the choice and the searcher back
//! over an `mpsc` channel.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use ferz_core::{Board, Move, legal_moves};

use crate::config::EngineConfig;
use crate::search::control::SearchControl;
use crate::search::{SearchResult, Searcher};

/// How hard the AI tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    /// A uniformly random legal move.
    Easy,
    /// A random capture when one exists, else a shallow fixed-depth search.
    Medium,
    /// Iterative deepening under the configured time budget.
    #[default]
    Hard,
}

impl Difficulty {
    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a difficulty name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: \"{found}\"")]
pub struct ParseDifficultyError {
    /// The rejected input.
    pub found: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError {
                found: s.to_string(),
            }),
        }
    }
}

/// Identifies one AI request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AiTicket(pub(crate) u64);

impl AiTicket {
    /// Numeric id, increasing per request.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AiTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a difficulty policy picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiChoice {
    /// The move to play, `None` when the side to move has no legal move.
    pub candidate: Option<Move>,
    /// The search came back empty and the move is a random one instead.
    pub fallback: bool,
    /// The search result, for the policies that searched.
    pub result: Option<SearchResult>,
}

impl AiChoice {
    fn random(candidate: Option<Move>) -> Self {
        Self {
            candidate,
            fallback: false,
            result: None,
        }
    }
}

/// A uniformly random legal move for the side to move.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Move> {
    legal_moves(board).as_slice().choose(rng).copied()
}

/// A uniformly random legal capture for the side to move.
pub fn random_capture<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Move> {
    let captures: Vec<Move> = legal_moves(board)
        .as_slice()
        .iter()
        .copied()
        .filter(|mv| board.is_occupied(mv.to()))
        .collect();
    captures.choose(rng).copied()
}

/// Run the `difficulty` policy on `board`.
///
/// Searches use `searcher` and honor `stop`. A search that completes no
/// depth falls back to a random legal move.
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    searcher: &mut Searcher,
    config: &EngineConfig,
    stop: &Arc<AtomicBool>,
    rng: &mut R,
) -> AiChoice {
    let (control, depth) = match difficulty {
        Difficulty::Easy => return AiChoice::random(random_move(board, rng)),
        Difficulty::Medium => {
            if let Some(capture) = random_capture(board, rng) {
                return AiChoice::random(Some(capture));
            }
            (
                SearchControl::new_infinite(Arc::clone(stop)),
                config.shallow_depth,
            )
        }
        Difficulty::Hard => (
            SearchControl::new_timed(Arc::clone(stop), config.time_budget),
            config.max_depth,
        ),
    };

    let result = searcher.search(board, depth, &control, |depth, score, nodes, mv| {
        debug!(depth, score, nodes, best = %mv, "ai iteration");
    });

    match result.best_move {
        Some(mv) => AiChoice {
            candidate: Some(mv),
            fallback: false,
            result: Some(result),
        },
        None => AiChoice {
            candidate: random_move(board, rng),
            fallback: true,
            result: Some(result),
        },
    }
}

/// Everything a worker needs for one move.
#[derive(Debug)]
pub struct AiJob {
    /// Request id.
    pub ticket: AiTicket,
    /// Game epoch the request was made in.
    pub epoch: u64,
    /// Snapshot of the position to move in.
    pub board: Board,
    /// Policy to run.
    pub difficulty: Difficulty,
    /// Budgets, depths, and weights.
    pub config: EngineConfig,
    /// Searcher lent to the worker for the duration of the move.
    pub searcher: Searcher,
    /// Raised to cut the search short.
    pub stop: Arc<AtomicBool>,
}

/// Completion message sent by a worker.
#[derive(Debug)]
pub struct AiDone {
    /// Request id.
    pub ticket: AiTicket,
    /// Game epoch the request was made in.
    pub epoch: u64,
    /// What the policy picked.
    pub choice: AiChoice,
    /// The searcher, handed back.
    pub searcher: Searcher,
}

/// Start a worker thread for `job`; it reports on `tx` when done.
pub fn spawn(job: AiJob, tx: Sender<AiDone>) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("ferz-ai".to_string())
        .spawn(move || {
            let AiJob {
                ticket,
                epoch,
                board,
                difficulty,
                config,
                mut searcher,
                stop,
            } = job;

            searcher.set_weights(config.weights);
            debug!(ticket = ticket.id(), %difficulty, "ai worker started");

            let mut rng = rand::rng();
            let choice = choose_move(&board, difficulty, &mut searcher, &config, &stop, &mut rng);
            debug!(
                ticket = ticket.id(),
                candidate = ?choice.candidate,
                fallback = choice.fallback,
                "ai worker finished"
            );

            // The game may have been dropped; nothing to report to then.
            let _ = tx.send(AiDone {
                ticket,
                epoch,
                choice,
                searcher,
            });
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::eval::Weights;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn random_move_is_legal() {
        let board = Board::starting_position();
        let mut rng = rng();
        for _ in 0..20 {
            let mv = random_move(&board, &mut rng).unwrap();
            assert!(legal_moves(&board).contains(mv));
        }
    }

    #[test]
    fn random_move_none_when_mated() {
        let board: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert_eq!(random_move(&board, &mut rng()), None);
    }

    #[test]
    fn random_capture_only_captures() {
        // White can take on d5 with the rook or on e6 with the knight.
        let board: Board = "4k3/8/4p3/2Nq4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let mut rng = rng();
        for _ in 0..20 {
            let mv = random_capture(&board, &mut rng).unwrap();
            assert!(board.is_occupied(mv.to()));
        }
        assert_eq!(random_capture(&Board::starting_position(), &mut rng), None);
    }

    #[test]
    fn easy_never_searches() {
        let board = Board::starting_position();
        let mut searcher = Searcher::new(1, Weights::default());
        let choice = choose_move(
            &board,
            Difficulty::Easy,
            &mut searcher,
            &EngineConfig::default(),
            &flag(),
            &mut rng(),
        );
        assert!(legal_moves(&board).contains(choice.candidate.unwrap()));
        assert!(!choice.fallback);
        assert!(choice.result.is_none());
    }

    #[test]
    fn medium_prefers_captures() {
        let board: Board = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let mut searcher = Searcher::new(1, Weights::default());
        let choice = choose_move(
            &board,
            Difficulty::Medium,
            &mut searcher,
            &EngineConfig::default(),
            &flag(),
            &mut rng(),
        );
        assert_eq!(choice.candidate.unwrap().to_string(), "d1d5");
        assert!(choice.result.is_none());
    }

    #[test]
    fn medium_searches_shallow_without_captures() {
        let board = Board::starting_position();
        let mut searcher = Searcher::new(1, Weights::default());
        let config = EngineConfig::default().with_shallow_depth(2);
        let choice = choose_move(
            &board,
            Difficulty::Medium,
            &mut searcher,
            &config,
            &flag(),
            &mut rng(),
        );
        let result = choice.result.unwrap();
        assert_eq!(result.depth, 2);
        assert_eq!(choice.candidate, result.best_move);
    }

    #[test]
    fn hard_finds_mate() {
        let board: Board = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4"
            .parse()
            .unwrap();
        let mut searcher = Searcher::new(1, Weights::default());
        let config = EngineConfig::default().with_max_depth(3);
        let choice = choose_move(
            &board,
            Difficulty::Hard,
            &mut searcher,
            &config,
            &flag(),
            &mut rng(),
        );
        assert_eq!(choice.candidate.unwrap().to_string(), "h5f7");
        assert!(!choice.fallback);
    }

    #[test]
    fn hard_falls_back_when_no_depth_completes() {
        let board = Board::starting_position();
        let mut searcher = Searcher::new(1, Weights::default());
        let config = EngineConfig::default().with_time_budget(Duration::ZERO);
        let choice = choose_move(
            &board,
            Difficulty::Hard,
            &mut searcher,
            &config,
            &flag(),
            &mut rng(),
        );
        assert!(choice.fallback);
        assert_eq!(choice.result.unwrap().depth, 0);
        assert!(legal_moves(&board).contains(choice.candidate.unwrap()));
    }

    #[test]
    fn worker_reports_and_returns_searcher() {
        let (tx, rx) = mpsc::channel();
        let board = Board::starting_position();
        let job = AiJob {
            ticket: AiTicket(3),
            epoch: 9,
            board,
            difficulty: Difficulty::Medium,
            config: EngineConfig::default().with_shallow_depth(1),
            searcher: Searcher::new(1, Weights::default()),
            stop: flag(),
        };
        let handle = spawn(job, tx).unwrap();
        let done = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        handle.join().unwrap();

        assert_eq!(done.ticket.id(), 3);
        assert_eq!(done.epoch, 9);
        assert!(legal_moves(&board).contains(done.choice.candidate.unwrap()));
        assert!(done.searcher.tt().entry(board.hash()).is_some());
    }
}
