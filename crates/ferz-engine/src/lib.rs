//! Evaluation, search, and game orchestration for ferz.

pub mod ai;
pub mod config;
pub mod error;
pub mod eval;
pub mod game;
pub mod search;

pub use ai::{AiChoice, AiTicket, Difficulty, ParseDifficultyError};
pub use config::EngineConfig;
pub use error::GameError;
pub use eval::{Weights, evaluate, evaluate_with};
pub use game::{AiOutcome, Game, MoveOutcome};
pub use search::control::SearchControl;
pub use search::tt::{MAX_HASH_MB, MIN_HASH_MB};
pub use search::{SearchResult, Searcher};
