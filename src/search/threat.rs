//! Threat analysis: per-cell attack and defense potential
//!
//! Every empty cell is scored for both sides by classifying the four lines
//! through it as if that side played there. The sum of the line scores is
//! the cell's score and the most severe line gives its threat level.
//!
//! Cells with a non-zero threat level for either side are "critical"; they
//! drive forced responses (win-in-one, blocking a five, blocking an open
//! three) and the greedy fallback.

use crate::board::{Board, Direction, Pos, Side, BOARD_SIZE};
use crate::eval::{classify_line, PatternKind};

/// Scan radius around existing stones for candidate moves
pub const CANDIDATE_RADIUS: i32 = 2;

/// What playing `cell` would give `side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatRecord {
    pub cell: Pos,
    pub side: Side,
    /// Most severe line shape through the cell
    pub pattern: PatternKind,
    /// Summed line scores over the four directions
    pub score: i32,
    /// Highest per-direction threat level
    pub threat_level: u8,
}

impl ThreatRecord {
    #[inline]
    pub fn is_five(&self) -> bool {
        self.pattern == PatternKind::Five
    }
}

/// A cell that matters to at least one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalCell {
    pub cell: Pos,
    /// max(own level, opponent level)
    pub threat_level: u8,
    /// own score + opponent score
    pub score: i32,
    pub own_level: u8,
    pub opponent_level: u8,
}

/// Result of `scan_threats`, from the perspective of `side`.
#[derive(Debug, Clone, Default)]
pub struct ThreatReport {
    /// Cells with a threat for the side to move, most severe first
    pub own_threats: Vec<ThreatRecord>,
    /// Cells with a threat for the opponent, most severe first
    pub opponent_threats: Vec<ThreatRecord>,
    /// Union of both, ranked by threat level then combined score
    pub critical: Vec<CriticalCell>,
}

impl ThreatReport {
    /// Cells where the side to move completes five.
    pub fn winning_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.own_threats
            .iter()
            .filter(|t| t.is_five())
            .map(|t| t.cell)
    }

    /// Cells where the opponent would complete five next turn.
    pub fn forced_blocks(&self) -> impl Iterator<Item = Pos> + '_ {
        self.opponent_threats
            .iter()
            .filter(|t| t.is_five())
            .map(|t| t.cell)
    }

    /// Cells where the opponent would make an open four: the open ends and
    /// gaps of their open threes.
    pub fn open_three_blocks(&self) -> impl Iterator<Item = Pos> + '_ {
        self.opponent_threats
            .iter()
            .filter(|t| t.pattern == PatternKind::OpenFour)
            .map(|t| t.cell)
    }

    /// Highest ranked critical cell
    pub fn top(&self) -> Option<&CriticalCell> {
        self.critical.first()
    }
}

/// Score `pos` (an empty cell) as a move for `side`.
pub fn evaluate_cell(board: &Board, pos: Pos, side: Side) -> ThreatRecord {
    debug_assert!(board.is_empty(pos), "evaluate_cell on occupied {pos}");
    let mut pattern = PatternKind::None;
    let mut score = 0;
    let mut threat_level = 0;
    for dir in Direction::ALL {
        let line = classify_line(board, pos, dir, side);
        score += line.score;
        threat_level = threat_level.max(line.threat_level);
        pattern = pattern.min(line.kind);
    }
    ThreatRecord {
        cell: pos,
        side,
        pattern,
        score,
        threat_level,
    }
}

/// Attack value plus defense value of playing `pos` for `side`.
#[inline]
pub fn quick_score(board: &Board, pos: Pos, side: Side) -> i32 {
    evaluate_cell(board, pos, side).score + evaluate_cell(board, pos, side.opponent()).score
}

fn rank_records(records: &mut [ThreatRecord]) {
    records.sort_by(|a, b| {
        b.threat_level
            .cmp(&a.threat_level)
            .then(b.score.cmp(&a.score))
            .then(a.cell.cmp(&b.cell))
    });
}

/// Scan every empty cell for both sides.
pub fn scan_threats(board: &Board, side: Side) -> ThreatReport {
    let mut report = ThreatReport::default();

    for pos in board.empty_cells() {
        let own = evaluate_cell(board, pos, side);
        let opp = evaluate_cell(board, pos, side.opponent());
        if own.threat_level == 0 && opp.threat_level == 0 {
            continue;
        }
        report.critical.push(CriticalCell {
            cell: pos,
            threat_level: own.threat_level.max(opp.threat_level),
            score: own.score + opp.score,
            own_level: own.threat_level,
            opponent_level: opp.threat_level,
        });
        if own.threat_level > 0 {
            report.own_threats.push(own);
        }
        if opp.threat_level > 0 {
            report.opponent_threats.push(opp);
        }
    }

    rank_records(&mut report.own_threats);
    rank_records(&mut report.opponent_threats);
    report.critical.sort_by(|a, b| {
        b.threat_level
            .cmp(&a.threat_level)
            .then(b.score.cmp(&a.score))
            .then(a.cell.cmp(&b.cell))
    });
    report
}

/// Empty cells within `radius` (Chebyshev distance) of any stone, in
/// row-major order. An empty board yields just the center.
pub fn candidate_cells(board: &Board, radius: i32) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![Pos::center()];
    }

    let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];
    for stone in board.occupied_cells() {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let r = i32::from(stone.row) + dr;
                let c = i32::from(stone.col) + dc;
                if !Pos::is_valid(r, c) {
                    continue;
                }
                #[allow(clippy::cast_sign_loss)]
                let (ru, cu) = (r as usize, c as usize);
                seen[ru][cu] = true;
            }
        }
    }

    let mut moves = Vec::with_capacity(64);
    for (r, row) in seen.iter().enumerate() {
        for (c, &near) in row.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let pos = Pos::new(r as u8, c as u8);
            if near && board.is_empty(pos) {
                moves.push(pos);
            }
        }
    }
    moves
}
