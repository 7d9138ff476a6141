//! Win condition checking for free-style five-in-a-row
//!
//! Five or more consecutive stones of one color in any of the four line
//! orientations wins. Overlines count.

use crate::board::{Board, Direction, Pos, Side, Stone};

/// Count consecutive `color` stones from `pos` stepping along `(dr, dc)`,
/// not counting `pos` itself.
#[inline]
fn run_length(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone) -> i32 {
    let mut count = 0;
    let mut step = 1;
    while let Some(next) = pos.offset(dr, dc, step) {
        if board.get(next) != color {
            break;
        }
        count += 1;
        step += 1;
    }
    count
}

/// Fast five-in-a-row check at a specific position.
///
/// Only checks the 4 orientations through `pos`, treating `pos` itself as a
/// `color` stone whether or not it is already on the board. No allocation.
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, color: Stone) -> bool {
    if color == Stone::Empty {
        return false;
    }
    Direction::ALL.iter().any(|dir| {
        let (dr, dc) = dir.delta();
        1 + run_length(board, pos, dr, dc, color) + run_length(board, pos, -dr, -dc, color) >= 5
    })
}

/// The line of five (or more) through `pos`, if the stone there completes one.
///
/// Returns the orientation and the cells of the run, ordered along the line.
pub fn find_five_line_at_pos(
    board: &Board,
    pos: Pos,
    color: Stone,
) -> Option<(Direction, Vec<Pos>)> {
    if color == Stone::Empty || board.get(pos) != color {
        return None;
    }
    for dir in Direction::ALL {
        let (dr, dc) = dir.delta();
        let back = run_length(board, pos, -dr, -dc, color);
        let fwd = run_length(board, pos, dr, dc, color);
        if 1 + back + fwd >= 5 {
            let line = (-back..=fwd)
                .filter_map(|step| pos.offset(dr, dc, step))
                .collect();
            return Some((dir, line));
        }
    }
    None
}

/// Find the positions of a 5-in-a-row for `side` if one exists.
pub fn find_five_positions(board: &Board, side: Side) -> Option<(Direction, Vec<Pos>)> {
    let color = side.stone();
    board
        .stones(side)
        .iter_ones()
        .find_map(|pos| find_five_line_at_pos(board, pos, color))
}

/// Check if there's 5+ in a row for the given side anywhere on the board
pub fn has_five_in_row(board: &Board, side: Side) -> bool {
    find_five_positions(board, side).is_some()
}

/// Check for a winner.
///
/// Positions reached through legal play contain at most one winning side;
/// for hand-built boards with both, Black is reported.
pub fn check_winner(board: &Board) -> Option<Side> {
    [Side::Black, Side::White]
        .into_iter()
        .find(|&side| has_five_in_row(board, side))
}
