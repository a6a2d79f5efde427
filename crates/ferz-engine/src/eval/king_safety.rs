//! King exposure: empty squares around each king.
//!
//! Counts the empty cells in the 3×3 block centred on the king (the king's
//! own cell is occupied, so at most eight). Edge and corner kings have
//! fewer neighbours and so less to lose.

use ferz_core::{Board, Color};

/// Number of empty squares adjacent to `color`'s king. Zero without a king.
pub fn exposure(board: &Board, color: Color) -> i32 {
    let Some(king_sq) = board.king_square(color) else {
        return 0;
    };

    let mut empty = 0;
    for dr in -1i8..=1 {
        for df in -1i8..=1 {
            if let Some(sq) = king_sq.offset(dr, df)
                && !board.is_occupied(sq)
            {
                empty += 1;
            }
        }
    }
    empty
}

/// King safety from White's perspective: Black's exposure minus White's.
///
/// Positive when the White king is the better sheltered one.
pub fn king_safety(board: &Board) -> i32 {
    exposure(board, Color::Black) - exposure(board, Color::White)
}
