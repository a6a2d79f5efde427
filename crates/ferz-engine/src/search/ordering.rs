//! Move ordering: TT move, promotions, MVV-LVA captures, then quiet moves.

use ferz_core::{Board, Move, MoveList, PieceKind, Square};

/// Score given to the transposition-table move.
const TT_MOVE_SCORE: i32 = 1_000_000;

/// Base score for promotions, above every capture.
const PROMOTION_SCORE: i32 = 100_000;

/// Base score for captures, above every quiet move.
const CAPTURE_SCORE: i32 = 10_000;

/// MVV-LVA: victim value first, the cheaper attacker breaks ties.
fn mvv_lva(victim: PieceKind, attacker: PieceKind) -> i32 {
    victim.value() * 8 - attacker.index() as i32
}

/// Score a move for ordering purposes. Higher is searched first.
///
/// Score bands:
/// - Promotions: 100,000 (plus the victim when it also captures)
/// - Captures: 10,000 + MVV-LVA
/// - Quiet: 0
pub fn score_move(board: &Board, mv: Move) -> i32 {
    let attacker = board
        .piece_at(mv.from())
        .map_or(PieceKind::Pawn, |p| p.kind());
    let capture = board
        .piece_at(mv.to())
        .map(|victim| mvv_lva(victim.kind(), attacker));

    let promotes = attacker == PieceKind::Pawn
        && board
            .color_at(mv.from())
            .is_some_and(|c| mv.to().rank() == c.promotion_rank());

    match (promotes, capture) {
        (true, Some(c)) => PROMOTION_SCORE + c,
        (true, None) => PROMOTION_SCORE,
        (false, Some(c)) => CAPTURE_SCORE + c,
        (false, None) => 0,
    }
}

/// Incremental move picker using selection sort.
///
/// Yields moves in descending score order. Only as much of the list is
/// sorted as the search consumes before a cutoff.
pub struct MovePicker {
    moves: [Move; 256],
    scores: [i32; 256],
    len: usize,
    cursor: usize,
}

impl MovePicker {
    /// Create a picker over `moves`.
    ///
    /// If `tt_move` matches a move in the list it is yielded first.
    pub fn new(moves: &MoveList, board: &Board, tt_move: Option<Move>) -> Self {
        let mut picker = Self {
            moves: [Move::new(Square::A1, Square::A1); 256],
            scores: [0; 256],
            len: moves.len(),
            cursor: 0,
        };
        for (i, &mv) in moves.as_slice().iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = if Some(mv) == tt_move {
                TT_MOVE_SCORE
            } else {
                score_move(board, mv)
            };
        }
        picker
    }

    /// Yield the next highest-scored move via selection sort.
    pub fn pick_next(&mut self) -> Option<Move> {
        if self.cursor >= self.len {
            return None;
        }

        let mut best_idx = self.cursor;
        let mut best_score = self.scores[self.cursor];
        for i in (self.cursor + 1)..self.len {
            if self.scores[i] > best_score {
                best_score = self.scores[i];
                best_idx = i;
            }
        }

        self.moves.swap(self.cursor, best_idx);
        self.scores.swap(self.cursor, best_idx);

        let mv = self.moves[self.cursor];
        self.cursor += 1;
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferz_core::legal_moves;

    fn drain(mut picker: MovePicker) -> Vec<Move> {
        let mut out = Vec::new();
        while let Some(mv) = picker.pick_next() {
            out.push(mv);
        }
        out
    }

    #[test]
    fn pawn_takes_queen_beats_queen_takes_pawn() {
        assert!(
            mvv_lva(PieceKind::Queen, PieceKind::Pawn) > mvv_lva(PieceKind::Pawn, PieceKind::Queen)
        );
    }

    #[test]
    fn lighter_attacker_preferred_for_same_victim() {
        let pxr = mvv_lva(PieceKind::Rook, PieceKind::Pawn);
        let nxr = mvv_lva(PieceKind::Rook, PieceKind::Knight);
        let qxr = mvv_lva(PieceKind::Rook, PieceKind::Queen);
        assert!(pxr > nxr);
        assert!(nxr > qxr);
    }

    #[test]
    fn picker_yields_every_move_once() {
        let board = Board::starting_position();
        let moves = legal_moves(&board);
        let yielded = drain(MovePicker::new(&moves, &board, None));
        assert_eq!(yielded.len(), 20);
        for mv in moves.as_slice() {
            assert!(yielded.contains(mv));
        }
    }

    #[test]
    fn order_is_tt_promotion_capture_quiet() {
        // Pawn on b7 can promote; the rook on d1 can take the queen on d5.
        let board: Board = "4k3/1P6/8/3q4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let moves = legal_moves(&board);
        let tt_move = Move::new(Square::E1, Square::F2);
        let order = drain(MovePicker::new(&moves, &board, Some(tt_move)));

        assert_eq!(order[0], tt_move);
        assert_eq!(order[1].from(), Square::B7);
        assert_eq!(order[2], Move::new(Square::D1, Square::D5));
        assert!(order[3..].iter().all(|mv| !board.is_occupied(mv.to())));
    }

    #[test]
    fn missing_tt_move_is_ignored() {
        let board = Board::starting_position();
        let moves = legal_moves(&board);
        let bogus = Move::new(Square::A1, Square::H8);
        assert_eq!(drain(MovePicker::new(&moves, &board, Some(bogus))).len(), 20);
    }
}
