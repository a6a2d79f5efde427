//! Perft (performance test) for move generation correctness verification.

use crate::board::Board;
use crate::movegen::legal_moves;

/// Count the number of leaf nodes at the given depth.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the number
/// of legal moves without playing them. Deeper levels make and unmake on a
/// single scratch board.
pub fn perft(board: &Board, depth: usize) -> u64 {
    let mut scratch = *board;
    perft_in_place(&mut scratch, depth)
}

fn perft_in_place(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &mv in moves.as_slice() {
        let undo = board.apply_move(mv);
        nodes += perft_in_place(board, depth - 1);
        board.unmake_move(mv, undo);
    }
    nodes
}

/// Run perft with per-move breakdown.
///
/// Returns `(coordinate_move, node_count)` pairs sorted alphabetically.
/// Depth 0 has no moves to break down and yields an empty list.
pub fn divide(board: &Board, depth: usize) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = legal_moves(board);
    let mut results: Vec<(String, u64)> = moves
        .as_slice()
        .iter()
        .map(|mv| {
            let child = board.make_move(*mv);
            let count = perft(&child, depth - 1);
            (mv.to_string(), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_startpos_depth_0() {
        assert_eq!(perft(&Board::starting_position(), 0), 1);
    }

    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&Board::starting_position(), 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&Board::starting_position(), 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&Board::starting_position(), 3), 8_902);
    }

    #[test]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&Board::starting_position(), 4), 197_281);
    }

    // r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1
    // One ply deep there is no en passant or promotion, so the count is standard.
    #[test]
    fn perft_kiwipete_depth_1() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(perft(&board, 1), 48);
    }

    #[test]
    fn perft_leaves_board_untouched() {
        let board = Board::starting_position();
        perft(&board, 3);
        assert_eq!(board, Board::starting_position());
    }

    #[test]
    fn divide_depth_0_is_empty() {
        assert!(divide(&Board::starting_position(), 0).is_empty());
        let results = divide(&Board::starting_position(), 1);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|(_, n)| *n == 1));
    }

    #[test]
    fn divide_sums_to_perft() {
        let board = Board::starting_position();
        let results = divide(&board, 3);
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 8_902);
        assert!(results.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(results.iter().any(|(mv, _)| mv == "e2e4"));
    }
}
