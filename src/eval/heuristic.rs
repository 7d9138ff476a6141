//! Heuristic evaluation function for Gomoku board positions
//!
//! Used at the leaves of the alpha-beta search. A position is scored by:
//! - Pattern scoring: every stone is classified along all four lines and
//!   the pattern scores are summed
//! - Positional bonuses (center control)

use crate::board::{Board, Direction, Side};

use super::patterns::classify_line;

/// Maximum Manhattan distance from center on a 15x15 board
const MAX_CENTER_DIST: i32 = 14;

/// Weight per distance unit from center
const POSITION_WEIGHT: i32 = 3;

/// Evaluate the board from the perspective of `side`.
///
/// Positive values favor `side`. The evaluation is symmetric, as negamax
/// requires: `evaluate(board, Black) == -evaluate(board, White)`.
#[must_use]
pub fn evaluate(board: &Board, side: Side) -> i32 {
    let opponent = side.opponent();

    let pattern_score = pattern_sum(board, side) - pattern_sum(board, opponent);
    let position_score = position_sum(board, side) - position_sum(board, opponent);

    pattern_score + position_score
}

/// Sum of line pattern scores over all stones of `side`, in all four
/// directions. A line is counted once per stone it contains, so longer
/// shapes weigh proportionally more.
pub fn pattern_sum(board: &Board, side: Side) -> i32 {
    board
        .stones(side)
        .iter_ones()
        .map(|pos| {
            Direction::ALL
                .iter()
                .map(|&dir| classify_line(board, pos, dir, side).score)
                .sum::<i32>()
        })
        .sum()
}

/// Positional bonus: stones closer to the center have more room to build
/// lines in every direction.
pub fn position_sum(board: &Board, side: Side) -> i32 {
    board
        .stones(side)
        .iter_ones()
        .map(|pos| (MAX_CENTER_DIST - pos.center_distance()) * POSITION_WEIGHT)
        .sum()
}
