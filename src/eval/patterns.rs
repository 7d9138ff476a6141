//! Line pattern recognition and pattern scores
//!
//! A pattern is read from a 9-cell window centered on a cell: 4 cells on
//! each side along one of the four line orientations. Off-board cells read
//! as blocked, the same as an opponent stone, so edge shapes count as
//! closed. The center cell is assumed to hold one of the side's stones,
//! which lets the same classifier score stones already on the board and
//! hypothetical placements on empty cells.
//!
//! Shapes are defined by how many cells complete a five:
//! - Five: five own stones in a row
//! - OpenFour: two or more completion points (`_XXXX_`, `X_XXX_X`)
//! - ClosedFour: exactly one completion point (`OXXXX_`, `XX_XX`)
//! - OpenThree: one more stone can make an OpenFour
//! - ClosedThree: one more stone can make a ClosedFour
//! - OpenTwo: one more stone can make an OpenThree
//!
//! All 3^8 windows are classified once into a lookup table.

use std::fmt;
use std::sync::OnceLock;

use crate::board::{Board, Direction, Pos, Side, Stone};

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 1_000_000;
    /// Open four: _OOOO_ (unstoppable)
    pub const OPEN_FOUR: i32 = 100_000;
    /// Closed four: XOOOO_ or _OOOOX (one way to complete)
    pub const CLOSED_FOUR: i32 = 50_000;
    /// Open three: _OOO_ (becomes open four if not blocked)
    pub const OPEN_THREE: i32 = 10_000;
    /// Closed three: XOOO_ or _OOOX.
    /// Well below OPEN_THREE since the opponent has a clear blocking point.
    pub const CLOSED_THREE: i32 = 1_500;
    /// Open two: _OO_ (potential to grow)
    pub const OPEN_TWO: i32 = 500;
}

/// Named line shapes, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternKind {
    Five,
    OpenFour,
    ClosedFour,
    OpenThree,
    ClosedThree,
    OpenTwo,
    None,
}

impl PatternKind {
    #[inline]
    pub fn score(self) -> i32 {
        match self {
            PatternKind::Five => PatternScore::FIVE,
            PatternKind::OpenFour => PatternScore::OPEN_FOUR,
            PatternKind::ClosedFour => PatternScore::CLOSED_FOUR,
            PatternKind::OpenThree => PatternScore::OPEN_THREE,
            PatternKind::ClosedThree => PatternScore::CLOSED_THREE,
            PatternKind::OpenTwo => PatternScore::OPEN_TWO,
            PatternKind::None => 0,
        }
    }

    /// Urgency 0..=5; 5 is an immediate win.
    #[inline]
    pub fn threat_level(self) -> u8 {
        match self {
            PatternKind::Five => 5,
            PatternKind::OpenFour => 4,
            PatternKind::ClosedFour | PatternKind::OpenThree => 3,
            PatternKind::ClosedThree => 2,
            PatternKind::OpenTwo => 1,
            PatternKind::None => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Five => "five",
            PatternKind::OpenFour => "open-four",
            PatternKind::ClosedFour => "closed-four",
            PatternKind::OpenThree => "open-three",
            PatternKind::ClosedThree => "closed-three",
            PatternKind::OpenTwo => "open-two",
            PatternKind::None => "none",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification result for one line through one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePattern {
    pub kind: PatternKind,
    pub score: i32,
    pub threat_level: u8,
}

impl LinePattern {
    pub const NONE: LinePattern = LinePattern {
        kind: PatternKind::None,
        score: 0,
        threat_level: 0,
    };

    #[inline]
    pub fn from_kind(kind: PatternKind) -> Self {
        Self {
            kind,
            score: kind.score(),
            threat_level: kind.threat_level(),
        }
    }
}

/// One cell of a classification window, relative to the side being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCell {
    Own,
    Empty,
    /// Opponent stone or off the board
    Blocked,
}

/// Cells in a window
pub const WINDOW_LEN: usize = 9;
const CENTER_SLOT: usize = WINDOW_LEN / 2;
const REACH: i32 = CENTER_SLOT as i32;
/// 3^8: every combination of the non-center cells
const TABLE_SIZE: usize = 6561;
const POW3: [usize; WINDOW_LEN - 1] = [1, 3, 9, 27, 81, 243, 729, 2187];

/// Every 5-cell segment of the window; each one covers the center slot.
const SEGMENTS: [u16; 5] = [
    0b0_0001_1111,
    0b0_0011_1110,
    0b0_0111_1100,
    0b0_1111_1000,
    0b1_1111_0000,
];

static PATTERN_TABLE: OnceLock<Vec<PatternKind>> = OnceLock::new();

#[inline]
fn window_slot(k: usize) -> usize {
    if k < CENTER_SLOT {
        k
    } else {
        k + 1
    }
}

#[inline]
fn trit(cell: WindowCell) -> usize {
    match cell {
        WindowCell::Empty => 0,
        WindowCell::Own => 1,
        WindowCell::Blocked => 2,
    }
}

/// Own and empty bitmasks over the 9 window slots; the center is own.
fn decode(mut idx: usize) -> (u16, u16) {
    let mut own = 1u16 << CENTER_SLOT;
    let mut empty = 0u16;
    for k in 0..WINDOW_LEN - 1 {
        let bit = 1u16 << window_slot(k);
        match idx % 3 {
            0 => empty |= bit,
            1 => own |= bit,
            _ => {}
        }
        idx /= 3;
    }
    (own, empty)
}

#[inline]
fn has_five(own: u16) -> bool {
    SEGMENTS.iter().any(|&seg| own & seg == seg)
}

/// Classify one window, looking up the already-classified windows that have
/// one more own stone.
fn classify_entry(idx: usize, table: &[PatternKind]) -> PatternKind {
    let (own, empty) = decode(idx);
    if has_five(own) {
        return PatternKind::Five;
    }

    let completions = (0..WINDOW_LEN)
        .filter(|&i| empty & (1 << i) != 0 && has_five(own | (1 << i)))
        .count();
    match completions {
        0 => {}
        1 => return PatternKind::ClosedFour,
        _ => return PatternKind::OpenFour,
    }

    let mut best = PatternKind::None;
    for (k, &pow) in POW3.iter().enumerate() {
        if empty & (1 << window_slot(k)) == 0 {
            continue;
        }
        let promoted = match table[idx + pow] {
            PatternKind::OpenFour => PatternKind::OpenThree,
            PatternKind::ClosedFour => PatternKind::ClosedThree,
            PatternKind::OpenThree => PatternKind::OpenTwo,
            _ => PatternKind::None,
        };
        best = best.min(promoted);
    }
    best
}

fn build_table() -> Vec<PatternKind> {
    let own_count = |mut idx: usize| {
        let mut n = 0;
        while idx > 0 {
            if idx % 3 == 1 {
                n += 1;
            }
            idx /= 3;
        }
        n
    };

    // Windows with more own stones first, so every promotion is already known.
    let mut order: Vec<usize> = (0..TABLE_SIZE).collect();
    order.sort_by_key(|&idx| std::cmp::Reverse(own_count(idx)));

    let mut table = vec![PatternKind::None; TABLE_SIZE];
    for idx in order {
        let kind = classify_entry(idx, &table);
        table[idx] = kind;
    }
    table
}

#[inline]
fn table() -> &'static [PatternKind] {
    PATTERN_TABLE.get_or_init(build_table)
}

/// Classify a window. The center slot is read as own unless it is blocked.
pub fn classify_window(cells: &[WindowCell; WINDOW_LEN]) -> PatternKind {
    if cells[CENTER_SLOT] == WindowCell::Blocked {
        return PatternKind::None;
    }
    let idx = (0..WINDOW_LEN - 1)
        .map(|k| trit(cells[window_slot(k)]) * POW3[k])
        .sum::<usize>();
    table()[idx]
}

/// Classify the line through `pos` along `dir` for `side`.
///
/// `pos` may be empty, in which case the shape is what `side` would get by
/// playing there. An opponent stone at `pos`, or a `pos` off the board,
/// yields `PatternKind::None`.
pub fn classify_line(board: &Board, pos: Pos, dir: Direction, side: Side) -> LinePattern {
    if !pos.in_bounds() {
        return LinePattern::NONE;
    }
    let own = side.stone();
    let center = board.get(pos);
    if center != own && center != Stone::Empty {
        return LinePattern::NONE;
    }

    let (dr, dc) = dir.delta();
    let mut idx = 0;
    let mut k = 0;
    for step in -REACH..=REACH {
        if step == 0 {
            continue;
        }
        let cell = match pos.offset(dr, dc, step).map(|p| board.get(p)) {
            Some(s) if s == own => WindowCell::Own,
            Some(Stone::Empty) => WindowCell::Empty,
            _ => WindowCell::Blocked,
        };
        idx += trit(cell) * POW3[k];
        k += 1;
    }
    LinePattern::from_kind(table()[idx])
}
