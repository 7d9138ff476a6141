//! Board representation for five-in-a-row

pub mod bitboard;
pub mod board;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

/// Board size (15x15)
pub const BOARD_SIZE: usize = 15;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 225

/// Row and column of the center cell
pub const CENTER: u8 = (BOARD_SIZE / 2) as u8;

/// Cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Numeric player id. `0` is reserved for "no side".
    #[inline]
    pub fn player_id(self) -> u8 {
        match self {
            Stone::Empty => 0,
            Stone::Black => 1,
            Stone::White => 2,
        }
    }

    #[inline]
    pub fn from_player_id(id: u8) -> Option<Stone> {
        match id {
            0 => Some(Stone::Empty),
            1 => Some(Stone::Black),
            2 => Some(Stone::White),
            _ => None,
        }
    }

    /// The side owning this stone, `None` for an empty cell.
    #[inline]
    pub fn side(self) -> Option<Side> {
        match self {
            Stone::Black => Some(Side::Black),
            Stone::White => Some(Side::White),
            Stone::Empty => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

/// One of the two players. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black,
    White,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    #[inline]
    pub fn stone(self) -> Stone {
        match self {
            Side::Black => Stone::Black,
            Side::White => Stone::White,
        }
    }

    /// Side that plays the given 0-based ply.
    #[inline]
    pub fn for_ply(ply: usize) -> Side {
        if ply % 2 == 0 {
            Side::Black
        } else {
            Side::White
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }
}

impl From<Side> for Stone {
    fn from(side: Side) -> Stone {
        side.stone()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" | "x" => Ok(Side::Black),
            "white" | "w" | "o" => Ok(Side::White),
            other => Err(EngineError::invalid_board(format!("unknown side '{other}'"))),
        }
    }
}

/// The four line orientations through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    /// (row, col) step along the line
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::Diagonal => "diagonal",
            Direction::AntiDiagonal => "anti-diagonal",
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Checked constructor from signed coordinates.
    pub fn try_new(row: i32, col: i32) -> Result<Self, EngineError> {
        if Self::is_valid(row, col) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(EngineError::out_of_range(row, col))
        }
    }

    /// The center cell (7, 7)
    #[inline]
    pub const fn center() -> Self {
        Self {
            row: CENTER,
            col: CENTER,
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Whether both coordinates are inside the board.
    #[inline]
    pub fn in_bounds(self) -> bool {
        Self::is_valid(i32::from(self.row), i32::from(self.col))
    }

    /// Cell `steps` away along `(dr, dc)`, if it is on the board.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, steps: i32) -> Option<Pos> {
        let r = i32::from(self.row) + dr * steps;
        let c = i32::from(self.col) + dc * steps;
        if Self::is_valid(r, c) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(Pos {
                row: r as u8,
                col: c as u8,
            })
        } else {
            None
        }
    }

    /// Manhattan distance to the center cell.
    #[inline]
    pub fn center_distance(self) -> i32 {
        let c = i32::from(CENTER);
        (i32::from(self.row) - c).abs() + (i32::from(self.col) - c).abs()
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// Column letter + row number counted from the bottom, e.g. `h8` is the center.
impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'a' + self.col) as char;
        write!(f, "{}{}", letter, BOARD_SIZE - self.row as usize)
    }
}

/// Accepts `h8` notation or a `row,col` pair.
impl FromStr for Pos {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((r, c)) = s.split_once(',') {
            let row: i32 = r
                .trim()
                .parse()
                .map_err(|_| EngineError::invalid_board(format!("bad row in '{s}'")))?;
            let col: i32 = c
                .trim()
                .parse()
                .map_err(|_| EngineError::invalid_board(format!("bad column in '{s}'")))?;
            return Pos::try_new(row, col);
        }

        let mut chars = s.chars();
        let letter = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(|| EngineError::invalid_board(format!("bad move '{s}'")))?;
        let number: i32 = chars
            .as_str()
            .parse()
            .map_err(|_| EngineError::invalid_board(format!("bad move '{s}'")))?;
        let col = i32::from(letter.to_ascii_lowercase() as u8) - i32::from(b'a');
        let row = BOARD_SIZE as i32 - number;
        Pos::try_new(row, col)
    }
}
