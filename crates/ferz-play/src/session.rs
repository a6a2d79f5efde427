//! Event-driven text session around a [`Game`].
//!
//! Input lines are read on a separate thread and forwarded over a channel;
//! the main loop waits on that channel with a timeout so AI results are
//! picked up while the user is idle.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use ferz_core::{Square, divide, perft};
use ferz_engine::{AiOutcome, EngineConfig, Game, MoveOutcome};

use crate::command::{Command, Setting, parse_command};
use crate::error::PlayError;

/// How long the loop waits for input before polling the AI.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Events processed by the main session loop.
enum SessionEvent {
    Line(Result<Command, PlayError>),
    InputClosed,
}

/// A text session: parses commands, drives the game, writes replies to `out`.
pub struct Session<W: Write> {
    game: Game,
    out: W,
}

impl<W: Write> Session<W> {
    /// Create a session with a fresh game.
    pub fn new(config: EngineConfig, out: W) -> Self {
        Self {
            game: Game::new(config),
            out,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the session until `quit` or end of input.
    ///
    /// When input ends while the AI is thinking, its move is awaited and
    /// reported before returning.
    pub fn run<R>(&mut self, input: R) -> Result<(), PlayError>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SessionEvent>();

        std::thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!(cmd = %trimmed, "received command");
                if tx.send(SessionEvent::Line(parse_command(trimmed))).is_err() {
                    return;
                }
            }
            let _ = tx.send(SessionEvent::InputClosed);
        });

        writeln!(self.out, "ferz ready, type `help` for commands")?;
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(SessionEvent::Line(Ok(cmd))) => {
                    if !self.execute(cmd)? {
                        break;
                    }
                }
                Ok(SessionEvent::Line(Err(e))) => {
                    warn!(error = %e, "command parse error");
                    writeln!(self.out, "error: {e}")?;
                }
                Ok(SessionEvent::InputClosed) | Err(RecvTimeoutError::Disconnected) => {
                    if let Some(outcome) = self.game.wait_ai() {
                        self.report_ai(&outcome)?;
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            if let Some(outcome) = self.game.poll_ai() {
                self.report_ai(&outcome)?;
            }
        }

        self.out.flush()?;
        info!("ferz shutting down");
        Ok(())
    }

    /// Run one command. Returns `false` when the session should end.
    pub fn execute(&mut self, cmd: Command) -> Result<bool, PlayError> {
        match cmd {
            Command::New => {
                self.game.reset();
                writeln!(self.out, "new game")?;
            }
            Command::Show => self.show()?,
            Command::Fen => writeln!(self.out, "{}", self.game.board())?,
            Command::Position(board) => {
                self.game.load_position(board);
                writeln!(self.out, "position set")?;
            }
            Command::Moves(sq) => self.list_moves(sq)?,
            Command::Move {
                from,
                to,
                promotion,
            } => match self.game.apply_move(from, to, promotion) {
                Ok(outcome) => self.report_move("you play", &outcome)?,
                Err(e) => {
                    warn!(error = %e, "move rejected");
                    writeln!(self.out, "error: {e}")?;
                }
            },
            Command::Ai(difficulty) => match self.game.request_ai_move(difficulty) {
                Ok(ticket) => writeln!(self.out, "thinking ({difficulty}, {ticket})")?,
                Err(e) => {
                    warn!(error = %e, "ai request rejected");
                    writeln!(self.out, "error: {e}")?;
                }
            },
            Command::Stop => {
                if !self.game.cancel_ai() {
                    writeln!(self.out, "nothing to stop")?;
                }
            }
            Command::Set(setting) => self.apply_setting(setting)?,
            Command::Perft(depth) => self.perft(depth)?,
            Command::Help => self.help()?,
            Command::Quit => {
                if self.game.cancel_ai()
                    && let Some(outcome) = self.game.wait_ai()
                {
                    self.report_ai(&outcome)?;
                }
                return Ok(false);
            }
            Command::Unknown(name) => {
                if !name.is_empty() {
                    warn!(cmd = %name, "unknown command");
                    writeln!(self.out, "unknown command: {name}")?;
                }
            }
        }
        Ok(true)
    }

    fn show(&mut self) -> Result<(), PlayError> {
        let board = self.game.board();
        writeln!(self.out, "{}", board.pretty())?;
        writeln!(
            self.out,
            "{} to move, {}",
            board.side_to_move().name(),
            self.game.status()
        )?;
        Ok(())
    }

    fn list_moves(&mut self, sq: Square) -> Result<(), PlayError> {
        let targets = self.game.legal_moves(sq);
        if targets.is_empty() {
            writeln!(self.out, "{sq}: no moves")?;
        } else {
            let list: Vec<String> = targets.iter().map(Square::to_string).collect();
            writeln!(self.out, "{sq}: {}", list.join(" "))?;
        }
        Ok(())
    }

    fn apply_setting(&mut self, setting: Setting) -> Result<(), PlayError> {
        let config = *self.game.config();
        let config = match setting {
            Setting::Budget(budget) => config.with_time_budget(budget),
            Setting::Depth(depth) => config.with_max_depth(depth),
            Setting::Shallow(depth) => config.with_shallow_depth(depth),
            Setting::Hash(mb) => config.with_hash_mb(mb),
        };
        self.game.set_config(config);
        writeln!(self.out, "ok")?;
        Ok(())
    }

    fn perft(&mut self, depth: usize) -> Result<(), PlayError> {
        let start = Instant::now();
        let board = self.game.board();
        let breakdown = divide(board, depth);
        let total = if breakdown.is_empty() {
            perft(board, depth)
        } else {
            breakdown.iter().map(|(_, nodes)| nodes).sum()
        };
        for (mv, nodes) in &breakdown {
            writeln!(self.out, "{mv}: {nodes}")?;
        }
        writeln!(self.out, "perft {depth}: {total} nodes")?;
        debug!(depth, total, elapsed = ?start.elapsed(), "perft done");
        Ok(())
    }

    fn help(&mut self) -> Result<(), PlayError> {
        writeln!(
            self.out,
            "commands: new, show, fen, position <fen|startpos> [moves ...], moves <sq>, \
             move <from><to>[q], ai [easy|medium|hard], stop, \
             set budget|depth|shallow|hash <n>, perft <n>, quit"
        )?;
        Ok(())
    }

    fn report_move(&mut self, who: &str, outcome: &MoveOutcome) -> Result<(), PlayError> {
        writeln!(self.out, "{who} {}", outcome.mv)?;
        if outcome.status.is_over() {
            writeln!(self.out, "game over: {}", outcome.status)?;
        } else if outcome.gives_check {
            writeln!(self.out, "check")?;
        }
        Ok(())
    }

    fn report_ai(&mut self, outcome: &AiOutcome) -> Result<(), PlayError> {
        match &outcome.applied {
            Some(applied) => self.report_move("ai plays", applied),
            None => {
                writeln!(self.out, "ai has no move: {}", outcome.status)?;
                Ok(())
            }
        }
    }
}
