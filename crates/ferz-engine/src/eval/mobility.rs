//! Mobility: how many pseudo-legal moves each side has.
//!
//! Pins and checks are ignored. The count is a cheap stand-in for piece
//! activity and costs one pseudo-legal generation per side.

use ferz_core::{Board, Color, generate_moves};

/// Pseudo-legal move count for one side.
pub fn mobility_count(board: &Board, color: Color) -> i32 {
    generate_moves(board, color, true).len() as i32
}

/// White's move count minus Black's.
pub fn mobility(board: &Board) -> i32 {
    mobility_count(board, Color::White) - mobility_count(board, Color::Black)
}

#[cfg(test)]
mod tests {
    use ferz_core::{Board, Color, Move, Square};

    use super::{mobility, mobility_count};

    #[test]
    fn starting_position_is_symmetric() {
        let board = Board::starting_position();
        assert_eq!(mobility_count(&board, Color::White), 20);
        assert_eq!(mobility(&board), 0);
    }

    #[test]
    fn opening_the_bishop_adds_mobility() {
        let board = Board::starting_position().make_move(Move::new(Square::E2, Square::E4));
        assert!(mobility(&board) > 0);
    }
}
