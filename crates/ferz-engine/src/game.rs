//! The game controller: owner of the authoritative board.
//!
//! Human moves are validated against the legal-move set before they touch
//! the board. AI moves are computed on a worker thread from a snapshot and
//! validated again when they come back, so a stale or broken result can
//! never corrupt the game.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use ferz_core::{Board, GameStatus, Move, PieceKind, Square, legal_moves, moves_for};

use crate::ai::{self, AiDone, AiJob, AiTicket, Difficulty};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::search::Searcher;

/// How often [`Game::wait_ai`] wakes up to check on the worker.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A move that was applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The move as played (promotions carry their piece).
    pub mv: Move,
    /// The side now to move is in check.
    pub gives_check: bool,
    /// Status for the side now to move.
    pub status: GameStatus,
}

/// A resolved AI request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiOutcome {
    /// The request this answers.
    pub ticket: AiTicket,
    /// The move played, `None` when the AI side had no legal move.
    pub applied: Option<MoveOutcome>,
    /// Status after the move (or of the position, if none was played).
    pub status: GameStatus,
    /// A random legal move was played instead of a searched one.
    pub fallback: bool,
}

/// The in-flight AI request.
#[derive(Debug)]
struct Pending {
    ticket: AiTicket,
    epoch: u64,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// One chess game plus its AI opponent.
#[derive(Debug)]
pub struct Game {
    board: Board,
    history: Vec<Move>,
    config: EngineConfig,
    /// `None` while a worker owns it.
    searcher: Option<Searcher>,
    pending: Option<Pending>,
    /// Bumped on every reset; results from older epochs are stale.
    epoch: u64,
    next_ticket: u64,
    pending_clear_tt: bool,
    /// TT resize (MB) to apply when the worker hands the searcher back.
    pending_resize_tt: Option<usize>,
    tx: Sender<AiDone>,
    rx: Receiver<AiDone>,
}

impl Game {
    /// Start a game from the standard position.
    pub fn new(config: EngineConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            board: Board::starting_position(),
            history: Vec::new(),
            config,
            searcher: Some(Searcher::new(config.hash_mb, config.weights)),
            pending: None,
            epoch: 0,
            next_ticket: 1,
            pending_clear_tt: false,
            pending_resize_tt: None,
            tx,
            rx,
        }
    }

    /// The current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Status for the side to move.
    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// Moves played since the last reset or position load.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Current engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the engine configuration.
    ///
    /// A new table size takes effect immediately when the searcher is home,
    /// otherwise once the worker hands it back.
    pub fn set_config(&mut self, config: EngineConfig) {
        let resize = config.hash_mb != self.config.hash_mb;
        self.config = config;

        match self.searcher.as_mut() {
            Some(searcher) => {
                searcher.set_weights(config.weights);
                if resize {
                    searcher.resize_tt(config.hash_mb);
                }
            }
            None if resize => self.pending_resize_tt = Some(config.hash_mb),
            None => {}
        }
        debug!(?config, "engine config updated");
    }

    /// Return `true` while an AI request is in flight.
    pub fn is_ai_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Destination squares for the piece on `sq`.
    ///
    /// Empty for an empty square or a piece of the side not to move.
    pub fn legal_moves(&self, sq: Square) -> Vec<Square> {
        if self.board.color_at(sq) != Some(self.board.side_to_move()) {
            return Vec::new();
        }
        moves_for(&self.board, sq, false)
    }

    /// Play a move for the side to move.
    ///
    /// A pawn reaching the last rank always becomes a queen: `promotion` may
    /// be `None` or `Some(Queen)` there, and must be `None` elsewhere.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, GameError> {
        if self.pending.is_some() {
            return Err(GameError::AiPending);
        }
        let status = self.board.status();
        if status.is_over() {
            return Err(GameError::GameOver { status });
        }

        let requested = match promotion {
            Some(kind) => Move::new_promotion(from, to, kind),
            None => Move::new(from, to),
        };
        let legal = legal_moves(&self.board);
        let mv = legal
            .as_slice()
            .iter()
            .copied()
            .find(|mv| {
                mv.from() == from
                    && mv.to() == to
                    && (promotion.is_none() || mv.promotion() == promotion)
            })
            .ok_or(GameError::IllegalMove { mv: requested })?;

        Ok(self.play(mv))
    }

    /// Start computing a move for the side to move on a worker thread.
    pub fn request_ai_move(&mut self, difficulty: Difficulty) -> Result<AiTicket, GameError> {
        if self.pending.is_some() {
            return Err(GameError::AiPending);
        }
        let status = self.board.status();
        if status.is_over() {
            return Err(GameError::GameOver { status });
        }

        let ticket = AiTicket(self.next_ticket);
        self.next_ticket += 1;

        let stop = Arc::new(AtomicBool::new(false));
        let searcher = self
            .searcher
            .take()
            .unwrap_or_else(|| Searcher::new(self.config.hash_mb, self.config.weights));

        let job = AiJob {
            ticket,
            epoch: self.epoch,
            board: self.board,
            difficulty,
            config: self.config,
            searcher,
            stop: Arc::clone(&stop),
        };
        let handle = ai::spawn(job, self.tx.clone())?;

        debug!(ticket = ticket.id(), %difficulty, fen = %self.board, "ai move requested");
        self.pending = Some(Pending {
            ticket,
            epoch: self.epoch,
            stop,
            handle,
        });
        Ok(ticket)
    }

    /// Collect a finished AI move without blocking, applying it if valid.
    ///
    /// Returns `None` while the worker is still thinking (or nothing was
    /// requested). Stale results are discarded here.
    pub fn poll_ai(&mut self) -> Option<AiOutcome> {
        loop {
            match self.rx.try_recv() {
                Ok(done) => {
                    if let Some(outcome) = self.handle_done(done) {
                        return Some(outcome);
                    }
                }
                Err(TryRecvError::Empty) => return self.check_worker_died(),
                Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Block until the in-flight AI move lands and apply it.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub fn wait_ai(&mut self) -> Option<AiOutcome> {
        loop {
            if let Some(outcome) = self.poll_ai() {
                return Some(outcome);
            }
            if self.pending.is_none() {
                return None;
            }
            match self.rx.recv_timeout(WAIT_POLL_INTERVAL) {
                Ok(done) => {
                    if let Some(outcome) = self.handle_done(done) {
                        return Some(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Ask the in-flight search to stop early.
    ///
    /// Its result is still validated and applied when it arrives. Returns
    /// `false` if nothing was pending.
    pub fn cancel_ai(&mut self) -> bool {
        match &self.pending {
            Some(pending) => {
                pending.stop.store(true, Ordering::Release);
                debug!(ticket = pending.ticket.id(), "ai search cancelled");
                true
            }
            None => false,
        }
    }

    /// Restore the starting position and full castling rights.
    ///
    /// Any in-flight AI request is stopped and its result will be ignored.
    pub fn reset(&mut self) {
        self.replace_board(Board::starting_position());
        info!("game reset");
    }

    /// Continue from an arbitrary position.
    ///
    /// Behaves like [`reset`](Self::reset) with `board` in place of the
    /// standard position.
    pub fn load_position(&mut self, board: Board) {
        self.replace_board(board);
        info!(fen = %self.board, "position loaded");
    }

    fn replace_board(&mut self, board: Board) {
        if let Some(pending) = self.pending.take() {
            pending.stop.store(true, Ordering::Release);
            debug!(ticket = pending.ticket.id(), "ai request invalidated");
        }
        self.epoch += 1;
        self.board = board;
        self.history.clear();

        match self.searcher.as_mut() {
            Some(searcher) => searcher.clear_tt(),
            None => self.pending_clear_tt = true,
        }
    }

    fn play(&mut self, mv: Move) -> MoveOutcome {
        self.board = self.board.make_move(mv);
        self.history.push(mv);

        let side = self.board.side_to_move();
        MoveOutcome {
            mv,
            gives_check: self.board.is_in_check(side),
            status: self.board.status(),
        }
    }

    /// Take back a searcher from a worker, applying deferred TT changes.
    fn reclaim(&mut self, mut searcher: Searcher) {
        if let Some(mb) = self.pending_resize_tt.take() {
            // A fresh allocation is already empty.
            searcher.resize_tt(mb);
            self.pending_clear_tt = false;
        } else if self.pending_clear_tt {
            searcher.clear_tt();
            self.pending_clear_tt = false;
        }
        searcher.set_weights(self.config.weights);
        self.searcher = Some(searcher);
    }

    fn handle_done(&mut self, done: AiDone) -> Option<AiOutcome> {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket == done.ticket && p.epoch == done.epoch);

        if !current || done.epoch != self.epoch {
            warn!(ticket = done.ticket.id(), "discarding stale ai result");
            if self.searcher.is_none() {
                self.reclaim(done.searcher);
            }
            return None;
        }

        let pending = self.pending.take()?;
        // The worker has already sent; this only reaps the thread.
        let _ = pending.handle.join();
        self.reclaim(done.searcher);

        if let Some(result) = done.choice.result {
            debug!(
                depth = result.depth,
                score = result.score,
                nodes = result.nodes,
                "ai search result"
            );
        }
        Some(self.resolve(pending.ticket, done.choice.candidate, done.choice.fallback))
    }

    /// Detect a worker that exited without reporting (it panicked).
    fn check_worker_died(&mut self) -> Option<AiOutcome> {
        if !self.pending.as_ref().is_some_and(|p| p.handle.is_finished()) {
            return None;
        }
        // It may have reported between the channel check and now.
        if let Ok(done) = self.rx.try_recv() {
            return self.handle_done(done);
        }

        let pending = self.pending.take()?;
        if pending.handle.join().is_err() {
            warn!(ticket = pending.ticket.id(), "ai worker panicked");
        }
        self.pending_clear_tt = false;
        self.pending_resize_tt = None;
        self.searcher = Some(Searcher::new(self.config.hash_mb, self.config.weights));
        Some(self.resolve(pending.ticket, None, true))
    }

    /// Validate `candidate` against the live position and play it, or a
    /// random legal move if it does not hold up.
    fn resolve(&mut self, ticket: AiTicket, candidate: Option<Move>, fallback: bool) -> AiOutcome {
        let legal = legal_moves(&self.board);
        let random = legal.as_slice().choose(&mut rand::rng()).copied();

        let (mv, fallback) = match candidate {
            Some(mv) if legal.contains(mv) => (Some(mv), fallback),
            Some(mv) => {
                warn!(ticket = ticket.id(), %mv, "ai move is not legal, playing a random move");
                (random, true)
            }
            None => {
                if random.is_some() {
                    warn!(ticket = ticket.id(), "ai produced no move, playing a random move");
                }
                (random, true)
            }
        };

        let Some(mv) = mv else {
            let status = self.board.status();
            info!(ticket = ticket.id(), %status, "ai side has no legal move");
            return AiOutcome {
                ticket,
                applied: None,
                status,
                fallback,
            };
        };

        let outcome = self.play(mv);
        info!(
            ticket = ticket.id(),
            %mv,
            check = outcome.gives_check,
            status = %outcome.status,
            fallback,
            "ai move applied"
        );
        AiOutcome {
            ticket,
            applied: Some(outcome),
            status: outcome.status,
            fallback,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        if let Some(pending) = &self.pending {
            pending.stop.store(true, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ferz_core::Color;

    fn quick_config() -> EngineConfig {
        EngineConfig::default()
            .with_time_budget(Duration::from_millis(200))
            .with_max_depth(3)
            .with_hash_mb(1)
    }

    fn sq(s: &str) -> Square {
        Square::from_coord(s).unwrap()
    }

    #[test]
    fn legal_moves_only_for_side_to_move() {
        let game = Game::new(quick_config());
        assert_eq!(game.legal_moves(sq("g1")), vec![sq("f3"), sq("h3")]);
        assert!(game.legal_moves(sq("e4")).is_empty());
        assert!(game.legal_moves(sq("e7")).is_empty());
    }

    #[test]
    fn apply_move_records_history() {
        let mut game = Game::new(quick_config());
        let outcome = game.apply_move(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(outcome.mv, Move::new(Square::E2, Square::E4));
        assert!(!outcome.gives_check);
        assert_eq!(outcome.status, GameStatus::Ongoing);
        assert_eq!(game.history(), &[outcome.mv]);
        assert_eq!(game.board().side_to_move(), Color::Black);
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut game = Game::new(quick_config());
        game.load_position("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap());

        let err = game
            .apply_move(sq("b7"), sq("b8"), Some(PieceKind::Knight))
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));

        let outcome = game.apply_move(sq("b7"), sq("b8"), None).unwrap();
        assert_eq!(outcome.mv.promotion(), Some(PieceKind::Queen));
        assert!(outcome.gives_check);
        assert_eq!(
            game.board().piece_at(Square::B8).map(|p| p.kind()),
            Some(PieceKind::Queen)
        );
    }

    #[test]
    fn promotion_piece_on_ordinary_move_is_illegal() {
        let mut game = Game::new(quick_config());
        let err = game
            .apply_move(sq("e2"), sq("e4"), Some(PieceKind::Queen))
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
        assert_eq!(*game.board(), Board::starting_position());
    }

    #[test]
    fn set_config_resizes_table_when_idle() {
        let mut game = Game::new(quick_config());
        let before = game.searcher.as_ref().unwrap().tt().capacity();
        game.set_config(quick_config().with_hash_mb(2));
        let after = game.searcher.as_ref().unwrap().tt().capacity();
        assert_eq!(after, before * 2);
        assert_eq!(game.config().hash_mb, 2);
    }

    #[test]
    fn stale_result_is_discarded_but_searcher_returns() {
        let mut game = Game::new(quick_config());
        let ticket = game.request_ai_move(Difficulty::Easy).unwrap();
        let epoch = game.epoch;
        game.reset();
        assert!(game.searcher.is_none());
        assert!(game.pending_clear_tt);

        // Simulate the late reply arriving after the reset.
        let stale = AiDone {
            ticket,
            epoch,
            choice: ai::AiChoice {
                candidate: Some(Move::new(Square::E2, Square::E4)),
                fallback: false,
                result: None,
            },
            searcher: Searcher::new(1, Default::default()),
        };
        assert!(game.handle_done(stale).is_none());
        assert!(game.searcher.is_some());
        assert!(!game.pending_clear_tt);
        assert_eq!(*game.board(), Board::starting_position());
    }

    #[test]
    fn illegal_candidate_falls_back_to_random() {
        let mut game = Game::new(quick_config());
        let ticket = AiTicket(99);
        let outcome = game.resolve(ticket, Some(Move::new(Square::E2, Square::E5)), false);
        assert!(outcome.fallback);
        let applied = outcome.applied.unwrap();
        assert!(legal_moves(&Board::starting_position()).contains(applied.mv));
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn no_legal_move_reports_terminal_status() {
        let mut game = Game::new(quick_config());
        game.load_position("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap());
        let outcome = game.resolve(AiTicket(1), None, false);
        assert_eq!(outcome.applied, None);
        assert_eq!(
            outcome.status,
            GameStatus::Checkmate {
                winner: Color::White
            }
        );
        assert!(game.history().is_empty());
    }
}
