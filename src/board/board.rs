//! Board structure with checked apply/undo

use std::fmt;

use super::bitboard::Bitboard;
use super::{Pos, Side, Stone, BOARD_SIZE};
use crate::error::EngineError;
use crate::rules::has_five_at_pos;

/// 15x15 game board.
///
/// Stones are only ever added one per ply and removed by `undo`, so a
/// placement followed by `undo` of the same cell restores the board
/// bit-for-bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Build a board from a row-major cell matrix.
    pub fn from_cells(cells: &[[Stone; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self::new();
        for (r, row) in cells.iter().enumerate() {
            for (c, &stone) in row.iter().enumerate() {
                board.place_stone(Pos::new(r as u8, c as u8), stone);
            }
        }
        board
    }

    /// Row-major cell matrix view of the board.
    pub fn to_cells(&self) -> [[Stone; BOARD_SIZE]; BOARD_SIZE] {
        let mut cells = [[Stone::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.get(Pos::new(r as u8, c as u8));
            }
        }
        cells
    }

    /// Parse the text format produced by `Display`: 15 rows of `.`, `X`, `O`.
    ///
    /// Whitespace inside rows is ignored; `x`/`o`/`b`/`w` are accepted too.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(EngineError::invalid_board(format!(
                "expected {BOARD_SIZE} rows, found {}",
                rows.len()
            )));
        }

        let mut board = Self::new();
        for (r, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE {
                return Err(EngineError::invalid_board(format!(
                    "row {r} has {} cells, expected {BOARD_SIZE}",
                    cells.len()
                )));
            }
            for (c, ch) in cells.into_iter().enumerate() {
                let stone = match ch {
                    '.' | '+' | '-' | '_' => Stone::Empty,
                    'X' | 'x' | 'B' | 'b' => Stone::Black,
                    'O' | 'o' | 'W' | 'w' => Stone::White,
                    other => {
                        return Err(EngineError::invalid_board(format!(
                            "unexpected '{other}' at row {r}, column {c}"
                        )))
                    }
                };
                board.place_stone(Pos::new(r as u8, c as u8), stone);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone without legality checks.
    /// Search uses this on cells it generated itself; use `apply` otherwise.
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        debug_assert!(
            stone == Stone::Empty || self.is_empty(pos),
            "placing on occupied cell {pos}"
        );
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    /// Remove a stone
    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Fail with `IllegalMove` unless `pos` is an empty cell on the board.
    pub fn check_legal(&self, pos: Pos) -> Result<(), EngineError> {
        let (row, col) = (i32::from(pos.row), i32::from(pos.col));
        if !pos.in_bounds() {
            return Err(EngineError::out_of_range(row, col));
        }
        if !self.is_empty(pos) {
            return Err(EngineError::occupied(row, col));
        }
        Ok(())
    }

    /// Place a stone for `side`, rejecting occupied or out-of-range cells.
    pub fn apply(&mut self, pos: Pos, side: Side) -> Result<(), EngineError> {
        self.check_legal(pos)?;
        self.place_stone(pos, side.stone());
        Ok(())
    }

    /// Clear a previously placed stone, returning what was there.
    pub fn undo(&mut self, pos: Pos) -> Result<Stone, EngineError> {
        let (row, col) = (i32::from(pos.row), i32::from(pos.col));
        if !pos.in_bounds() {
            return Err(EngineError::out_of_range(row, col));
        }
        let stone = self.get(pos);
        if stone == Stone::Empty {
            return Err(EngineError::IllegalMove {
                row,
                col,
                reason: "no stone to undo",
            });
        }
        self.remove_stone(pos);
        Ok(stone)
    }

    /// Whether the stone of `side` at `pos` completes five or more in a row.
    #[inline]
    pub fn has_five(&self, pos: Pos, side: Side) -> bool {
        has_five_at_pos(self, pos, side.stone())
    }

    /// Bitboard for a side
    #[inline]
    pub fn stones(&self, side: Side) -> &Bitboard {
        match side {
            Side::Black => &self.black,
            Side::White => &self.white,
        }
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// No empty cell left
    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == BOARD_SIZE * BOARD_SIZE
    }

    /// Black moves when both sides have the same number of stones.
    pub fn side_to_move(&self) -> Side {
        if self.black.count() <= self.white.count() {
            Side::Black
        } else {
            Side::White
        }
    }

    /// All empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..BOARD_SIZE * BOARD_SIZE)
            .map(Pos::from_index)
            .filter(move |&p| self.is_empty(p))
    }

    /// All stones of both colors
    pub fn occupied_cells(&self) -> impl Iterator<Item = Pos> {
        self.black.iter_ones().chain(self.white.iter_ones())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_SIZE {
            let line: String = (0..BOARD_SIZE)
                .map(|c| self.get(Pos::new(r as u8, c as u8)).symbol())
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
