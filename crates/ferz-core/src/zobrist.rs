//! Zobrist keys for transposition-table lookups.

use crate::board::Board;
use crate::color::Color;

/// Zobrist key for each (piece, square) pair. Indexed by `[Piece::index()][Square::index()]`.
static PIECE_SQUARE: [[u64; 64]; 12] = {
    let mut table = [[0u64; 64]; 12];
    let mut state = SEED;
    let mut piece = 0;
    while piece < 12 {
        let mut sq = 0;
        while sq < 64 {
            let (val, next) = xorshift64(state);
            table[piece][sq] = val;
            state = next;
            sq += 1;
        }
        piece += 1;
    }
    table
};

/// Zobrist key XORed when Black is the side to move.
static SIDE_TO_MOVE: u64 = {
    let mut state = SEED;
    // Advance past all 12*64 = 768 piece-square keys
    let mut i = 0;
    while i < 768 {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let (val, _) = xorshift64(state);
    val
};

const SEED: u64 = 0x5a4f_4252_4953_5421; // "ZOBRIST!"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Hash the 64 cells and the side to move.
pub fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0u64;
    for (sq, piece) in board.pieces() {
        hash ^= PIECE_SQUARE[piece.index()][sq.index()];
    }
    if board.side_to_move() == Color::Black {
        hash ^= SIDE_TO_MOVE;
    }
    hash
}
