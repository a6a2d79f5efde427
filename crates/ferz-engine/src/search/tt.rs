//! Transposition table: a fixed-size slot array indexed by Zobrist key.
//!
//! Scores are stored from White's perspective with mate distances measured
//! from the stored node, so one entry serves every path and both sides.

use ferz_core::{Color, Move};

use crate::search::negamax::MATE_THRESHOLD;

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The stored score is exact (every child searched inside the window).
    Exact,
    /// The stored score is a lower bound (failed high / beta cutoff).
    LowerBound,
    /// The stored score is an upper bound (failed low / all-node).
    UpperBound,
}

/// One stored search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    /// Full Zobrist key of the position.
    pub key: u64,
    /// Remaining depth the score was searched to.
    pub depth: u8,
    /// Score from White's perspective, mate distance relative to this node.
    pub score: i32,
    /// Best move found, if the node had any move that raised alpha.
    pub best_move: Option<Move>,
    /// How `score` relates to the true value.
    pub bound: Bound,
}

/// Result of a successful TT probe, converted back into search terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtProbe {
    /// Best move from a previous search of this position.
    pub best_move: Option<Move>,
    /// Search depth of the stored entry.
    pub depth: u8,
    /// Bound type (exact, lower, or upper).
    pub bound: Bound,
    /// Score for the side to move, mate distance relative to the root.
    pub score: i32,
}

/// Convert a side-relative search score at `ply` into the stored form.
///
/// Mate scores are path-dependent: `MATE_SCORE - ply` changes with the
/// path. Stored as distance-from-node they become path-independent.
pub fn score_to_tt(score: i32, ply: u8, side: Color) -> i32 {
    let adjusted = if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    };
    adjusted * side.sign()
}

/// Reverse [`score_to_tt`] for `side` probing at `ply`.
pub fn score_from_tt(stored: i32, ply: u8, side: Color) -> i32 {
    let score = stored * side.sign();
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Smallest accepted table size in megabytes.
pub const MIN_HASH_MB: usize = 1;

/// Largest accepted table size in megabytes.
pub const MAX_HASH_MB: usize = 65536;

/// Power-of-two number of slots that fit in `mb` megabytes, at least one.
fn slot_count(mb: usize) -> usize {
    let bytes = mb.min(MAX_HASH_MB).saturating_mul(1024 * 1024);
    let wanted = (bytes / std::mem::size_of::<Option<TtEntry>>()).max(1);
    if wanted.is_power_of_two() {
        wanted
    } else {
        wanted.next_power_of_two() >> 1
    }
}

/// Fixed-size, single-owner transposition table.
pub struct TranspositionTable {
    slots: Box<[Option<TtEntry>]>,
    /// Index mask: `slots.len() - 1` (power-of-two allocation).
    mask: u64,
}

impl TranspositionTable {
    /// Create a table of about `mb` megabytes.
    ///
    /// `mb` is capped at [`MAX_HASH_MB`]. The slot count is rounded down to
    /// a power of two, minimum one.
    pub fn new(mb: usize) -> Self {
        let count = slot_count(mb);
        Self {
            slots: vec![None; count].into_boxed_slice(),
            mask: (count - 1) as u64,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Empty every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Look up `key` for `side` to move at `ply`.
    pub fn probe(&self, key: u64, ply: u8, side: Color) -> Option<TtProbe> {
        let entry = self.slots[(key & self.mask) as usize]?;
        if entry.key != key {
            return None;
        }
        Some(TtProbe {
            best_move: entry.best_move,
            depth: entry.depth,
            bound: entry.bound,
            score: score_from_tt(entry.score, ply, side),
        })
    }

    /// Store a side-relative `score` for `key`.
    ///
    /// An existing entry for the same key is only replaced by one of equal
    /// or greater depth. A different key in the slot is always overwritten.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u64,
        depth: u8,
        score: i32,
        best_move: Option<Move>,
        bound: Bound,
        ply: u8,
        side: Color,
    ) {
        let slot = &mut self.slots[(key & self.mask) as usize];
        if let Some(existing) = *slot
            && existing.key == key
            && existing.depth > depth
        {
            return;
        }

        *slot = Some(TtEntry {
            key,
            depth,
            score: score_to_tt(score, ply, side),
            best_move,
            bound,
        });
    }

    /// Raw entry for `key`, as stored.
    pub fn entry(&self, key: u64) -> Option<TtEntry> {
        self.slots[(key & self.mask) as usize].filter(|e| e.key == key)
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .finish()
    }
}
