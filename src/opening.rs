//! Opening book
//!
//! A handful of short opening lines starting with Black on the center.
//! Lines are matched under the eight rotations and reflections of the board
//! around the center, and recommendations are mapped back into the board's
//! orientation.

use crate::board::{Board, Pos, Side, CENTER};

/// The eight symmetries of the square board that keep the center fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    Identity,
    Rot90,
    Rot180,
    Rot270,
    /// Mirror left-right
    FlipH,
    /// Mirror top-bottom
    FlipV,
    /// Mirror across the main diagonal
    Transpose,
    /// Mirror across the anti-diagonal
    AntiTranspose,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::FlipH,
        Symmetry::FlipV,
        Symmetry::Transpose,
        Symmetry::AntiTranspose,
    ];

    /// Map a book cell onto the board.
    pub fn apply(self, pos: Pos) -> Pos {
        let c = i32::from(CENTER);
        let (dr, dc) = (i32::from(pos.row) - c, i32::from(pos.col) - c);
        let (r, k) = match self {
            Symmetry::Identity => (dr, dc),
            Symmetry::Rot90 => (dc, -dr),
            Symmetry::Rot180 => (-dr, -dc),
            Symmetry::Rot270 => (-dc, dr),
            Symmetry::FlipH => (dr, -dc),
            Symmetry::FlipV => (-dr, dc),
            Symmetry::Transpose => (dc, dr),
            Symmetry::AntiTranspose => (-dc, -dr),
        };
        // The board is square around the center, so every image is on it.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Pos::new((c + r) as u8, (c + k) as u8)
    }
}

/// A named opening line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningEntry {
    pub name: &'static str,
    /// Expected moves, Black first, alternating
    pub sequence: Vec<Pos>,
    /// Recommended replies once the whole sequence is on the board
    pub follow_ups: Vec<Pos>,
    /// Static quality, 0-100; better lines are tried first
    pub quality: u8,
}

impl OpeningEntry {
    fn new(name: &'static str, sequence: &[(u8, u8)], follow_ups: &[(u8, u8)], quality: u8) -> Self {
        let to_pos = |&(r, c): &(u8, u8)| Pos::new(r, c);
        Self {
            name,
            sequence: sequence.iter().map(to_pos).collect(),
            follow_ups: follow_ups.iter().map(to_pos).collect(),
            quality,
        }
    }

    /// Whether the first `plies` moves of the line, seen through `sym`, are
    /// on the board with the right colors.
    fn prefix_matches(&self, board: &Board, plies: usize, sym: Symmetry) -> bool {
        self.sequence
            .iter()
            .take(plies)
            .enumerate()
            .all(|(ply, &pos)| board.get(sym.apply(pos)) == Side::for_ply(ply).stone())
    }

    /// Whether `moves` starts with this line seen through `sym`.
    fn is_prefix_of(&self, moves: &[Pos], sym: Symmetry) -> bool {
        moves.len() >= self.sequence.len()
            && self
                .sequence
                .iter()
                .zip(moves)
                .all(|(&book, &played)| sym.apply(book) == played)
    }
}

/// Read-only table of opening lines.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    entries: Vec<OpeningEntry>,
}

impl OpeningBook {
    /// Build a book; entries are tried best quality first.
    pub fn new(mut entries: Vec<OpeningEntry>) -> Self {
        entries.sort_by(|a, b| b.quality.cmp(&a.quality));
        Self { entries }
    }

    /// The built-in lines: the two second-move replies (adjacent to the
    /// center stone orthogonally or diagonally) and their common third moves.
    pub fn with_standard_openings() -> Self {
        Self::new(vec![
            OpeningEntry::new("direct-reply", &[(7, 7), (6, 7)], &[], 60),
            OpeningEntry::new("indirect-reply", &[(7, 7), (6, 8)], &[], 60),
            OpeningEntry::new(
                "direct-flower",
                &[(7, 7), (6, 7), (6, 8)],
                &[(8, 6), (5, 9)],
                80,
            ),
            OpeningEntry::new(
                "direct-cross",
                &[(7, 7), (6, 7), (7, 8)],
                &[(7, 6), (7, 9)],
                70,
            ),
            OpeningEntry::new(
                "direct-far",
                &[(7, 7), (6, 7), (8, 8)],
                &[(6, 6), (9, 9)],
                55,
            ),
            OpeningEntry::new(
                "indirect-adjacent",
                &[(7, 7), (6, 8), (6, 7)],
                &[(8, 7), (5, 7)],
                75,
            ),
            OpeningEntry::new(
                "indirect-row",
                &[(7, 7), (6, 8), (7, 8)],
                &[(7, 6), (7, 9)],
                65,
            ),
        ])
    }

    pub fn entries(&self) -> &[OpeningEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Book move for a board reached after `ply_count` plies.
    ///
    /// Returns the line's next move while the board is inside a line, or the
    /// first legal follow-up once the whole line has been played.
    pub fn lookup(&self, board: &Board, ply_count: usize) -> Option<Pos> {
        self.lookup_entry(board, ply_count).map(|(_, pos)| pos)
    }

    /// Like `lookup`, also naming the matched line.
    pub fn lookup_entry(&self, board: &Board, ply_count: usize) -> Option<(&OpeningEntry, Pos)> {
        if board.stone_count() as usize != ply_count {
            return None;
        }

        for entry in &self.entries {
            if ply_count > entry.sequence.len() {
                continue;
            }
            for sym in Symmetry::ALL {
                if !entry.prefix_matches(board, ply_count, sym) {
                    continue;
                }
                let recommended = match entry.sequence.get(ply_count) {
                    Some(&next) => Some(sym.apply(next)).filter(|&p| board.is_empty(p)),
                    None => entry
                        .follow_ups
                        .iter()
                        .map(|&p| sym.apply(p))
                        .find(|&p| board.is_empty(p)),
                };
                if let Some(pos) = recommended {
                    return Some((entry, pos));
                }
            }
        }
        None
    }

    /// Most specific line that `moves` begins with, under any symmetry.
    pub fn identify(&self, moves: &[Pos]) -> Option<&OpeningEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                Symmetry::ALL
                    .iter()
                    .any(|&sym| entry.is_prefix_of(moves, sym))
            })
            .max_by(|a, b| {
                a.sequence
                    .len()
                    .cmp(&b.sequence.len())
                    .then(a.quality.cmp(&b.quality))
            })
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::with_standard_openings()
    }
}
