//! Five-in-a-row move engine
//!
//! Decides moves on a 15x15 free-style Gomoku board:
//! - Five or more in a row wins, overlines included
//! - Black moves first
//! - No captures, no forbidden shapes
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Win detection
//! - [`eval`]: Line pattern recognition and static evaluation
//! - [`search`]: Threat analysis and alpha-beta search
//! - [`opening`]: Opening book
//! - [`engine`]: Decision procedure tying the above together
//! - [`training`]: Self-play games and their statistics
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{decide_move, Board, Difficulty, Pos, Side};
//!
//! let mut board = Board::new();
//! board.apply(Pos::new(7, 7), Side::Black).unwrap();
//!
//! let reply = decide_move(&board, Side::White, Difficulty::Medium).unwrap();
//! board.apply(reply, Side::White).unwrap();
//! println!("{board}");
//! ```
//!
//! # Decision Priority
//!
//! 1. Center on an empty board
//! 2. Win in one
//! 3. Block an opponent five
//! 4. Block an opponent open three
//! 5. Attack with a strong own threat
//! 6. Opening book during the first plies
//! 7. Alpha-beta search (Hard)
//! 8. Best own cell, random among exact ties

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod opening;
pub mod rules;
pub mod search;
pub mod training;

// Re-export commonly used types for convenience
pub use board::{Board, Direction, Pos, Side, Stone, BOARD_SIZE};
pub use config::{Difficulty, EngineConfig, TrainerConfig};
pub use engine::{AIEngine, MoveResult, SearchType};
pub use error::EngineError;
pub use eval::{classify_line, LinePattern, PatternKind};
pub use opening::{OpeningBook, OpeningEntry};
pub use search::{scan_threats, ThreatReport};
pub use training::{
    run_self_play_game, GameRecord, SelfPlayTrainer, TrainingScheduler, TrainingStatistics,
};

/// Move for `side` at `difficulty`, or `None` on a full board.
///
/// Builds a fresh engine per call; keep an [`AIEngine`] around to reuse
/// one across moves.
pub fn decide_move(board: &Board, side: Side, difficulty: Difficulty) -> Option<Pos> {
    AIEngine::for_difficulty(difficulty).get_move(board, side)
}

/// Like [`decide_move`] but reports internal faults instead of logging them.
pub fn try_decide_move(
    board: &Board,
    side: Side,
    difficulty: Difficulty,
) -> Result<Option<Pos>, EngineError> {
    Ok(AIEngine::for_difficulty(difficulty)
        .try_decide(board, side)?
        .best_move)
}

/// [`decide_move`] on a raw cell matrix.
pub fn decide_move_cells(
    cells: &[[Stone; BOARD_SIZE]; BOARD_SIZE],
    side: Side,
    difficulty: Difficulty,
) -> Option<Pos> {
    decide_move(&Board::from_cells(cells), side, difficulty)
}

/// Book move for a board reached after `ply_count` plies.
pub fn opening_lookup(board: &Board, ply_count: usize) -> Option<Pos> {
    OpeningBook::with_standard_openings().lookup(board, ply_count)
}
