//! Zobrist hashing for position identification
//!
//! Zobrist hashing allows O(1) incremental hash updates when placing/removing stones.
//! The search uses it to key its per-call evaluation cache.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Side};
//! use gomoku::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut board = Board::new();
//!
//! let hash1 = zt.hash(&board, Side::Black);
//!
//! let pos = Pos::new(7, 7);
//! board.place_stone(pos, Side::Black.stone());
//! let hash2 = zt.hash(&board, Side::White);
//!
//! // Incremental update is equivalent to full recomputation
//! assert_eq!(zt.update_place(hash1, pos, Side::Black), hash2);
//! ```

use crate::board::{Board, Pos, Side, TOTAL_CELLS};

/// Zobrist hash table for position hashing.
///
/// One random key per (cell, side) plus a key XORed in when Black is to move.
pub struct ZobristTable {
    /// Random values per side, indexed by `Side::index()` then cell index
    stones: [[u64; TOTAL_CELLS]; 2],
    /// Random value XORed when black is to move
    black_to_move: u64,
}

impl ZobristTable {
    /// Create a new Zobrist table with deterministic random values.
    ///
    /// Uses a linear congruential generator (LCG) with a fixed seed
    /// so hashes are reproducible across runs.
    #[must_use]
    pub fn new() -> Self {
        // Constants from Knuth's MMIX LCG
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            seed
        };

        let mut stones = [[0u64; TOTAL_CELLS]; 2];
        for i in 0..TOTAL_CELLS {
            stones[0][i] = next_rand();
            stones[1][i] = next_rand();
        }

        Self {
            stones,
            black_to_move: next_rand(),
        }
    }

    #[inline]
    fn key(&self, pos: Pos, side: Side) -> u64 {
        self.stones[side.index()][pos.to_index()]
    }

    /// Compute the full hash for a board position.
    ///
    /// For incremental updates during search, use `update_place` and
    /// `update_remove` instead.
    #[must_use]
    pub fn hash(&self, board: &Board, side_to_move: Side) -> u64 {
        let mut h = 0u64;
        for side in [Side::Black, Side::White] {
            for pos in board.stones(side).iter_ones() {
                h ^= self.key(pos, side);
            }
        }
        if side_to_move == Side::Black {
            h ^= self.black_to_move;
        }
        h
    }

    /// Incrementally update hash after `side` places a stone at `pos`.
    ///
    /// Also toggles the side-to-move component.
    #[inline]
    #[must_use]
    pub fn update_place(&self, hash: u64, pos: Pos, side: Side) -> u64 {
        hash ^ self.key(pos, side) ^ self.black_to_move
    }

    /// Incrementally update hash after removing `side`'s stone at `pos`.
    ///
    /// XOR is its own inverse, so this is identical to `update_place`.
    #[inline]
    #[must_use]
    pub fn update_remove(&self, hash: u64, pos: Pos, side: Side) -> u64 {
        self.update_place(hash, pos, side)
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zobrist_empty_board() {
        let zt = ZobristTable::new();
        let board = Board::new();

        let hash1 = zt.hash(&board, Side::Black);
        let hash2 = zt.hash(&board, Side::White);

        assert_ne!(hash1, hash2, "side to move must be part of the key");
        assert_eq!(hash2, 0);
        assert_eq!(hash1, zt.black_to_move);
    }

    #[test]
    fn test_zobrist_deterministic() {
        let zt1 = ZobristTable::new();
        let zt2 = ZobristTable::new();
        let mut board = Board::new();
        board.place_stone(Pos::new(3, 4), Side::White.stone());

        assert_eq!(zt1.hash(&board, Side::Black), zt2.hash(&board, Side::Black));
    }

    #[test]
    fn test_zobrist_same_position_different_path() {
        let zt = ZobristTable::new();
        let mut board1 = Board::new();
        let mut board2 = Board::new();

        board1.place_stone(Pos::new(7, 7), Side::Black.stone());
        board1.place_stone(Pos::new(8, 8), Side::White.stone());

        board2.place_stone(Pos::new(8, 8), Side::White.stone());
        board2.place_stone(Pos::new(7, 7), Side::Black.stone());

        assert_eq!(zt.hash(&board1, Side::Black), zt.hash(&board2, Side::Black));
    }

    #[test]
    fn test_zobrist_color_matters() {
        let zt = ZobristTable::new();
        let mut board1 = Board::new();
        let mut board2 = Board::new();
        board1.place_stone(Pos::new(7, 7), Side::Black.stone());
        board2.place_stone(Pos::new(7, 7), Side::White.stone());

        assert_ne!(zt.hash(&board1, Side::Black), zt.hash(&board2, Side::Black));
    }

    #[test]
    fn test_zobrist_place_and_remove() {
        let zt = ZobristTable::new();
        let mut board = Board::new();
        let pos = Pos::new(7, 7);

        let hash_empty = zt.hash(&board, Side::Black);

        board.place_stone(pos, Side::Black.stone());
        let hash_with_stone = zt.hash(&board, Side::White);
        assert_eq!(zt.update_place(hash_empty, pos, Side::Black), hash_with_stone);

        board.remove_stone(pos);
        let hash_after_remove = zt.hash(&board, Side::Black);
        assert_eq!(
            zt.update_remove(hash_with_stone, pos, Side::Black),
            hash_after_remove
        );
        assert_eq!(hash_after_remove, hash_empty);
    }

    #[test]
    fn test_zobrist_all_corners() {
        let zt = ZobristTable::new();
        let mut board = Board::new();
        let corners = [
            Pos::new(0, 0),
            Pos::new(0, 14),
            Pos::new(14, 0),
            Pos::new(14, 14),
        ];
        for &pos in &corners {
            board.place_stone(pos, Side::Black.stone());
        }

        let expected = corners
            .iter()
            .fold(0, |h, &p| h ^ zt.key(p, Side::Black));
        assert_eq!(zt.hash(&board, Side::White), expected);
    }
}
