//! Center occupation bonus.

use ferz_core::{Board, Square};

/// The four central squares.
const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// Net count of central squares held, from White's perspective.
///
/// Each occupant counts once regardless of its kind. The caller scales by
/// the center weight.
pub fn center_control(board: &Board) -> i32 {
    CENTER
        .iter()
        .filter_map(|&sq| board.color_at(sq))
        .map(|color| color.sign())
        .sum()
}
