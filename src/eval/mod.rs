//! Evaluation module for Gomoku positions
//!
//! This module provides pattern recognition and scoring for board positions.
//! The evaluation considers:
//! - Line patterns (fives, fours, threes, twos)
//! - Positional bonuses (center control)

pub mod heuristic;
pub mod patterns;

pub use heuristic::evaluate;
pub use patterns::{classify_line, classify_window, LinePattern, PatternKind, PatternScore, WindowCell};
