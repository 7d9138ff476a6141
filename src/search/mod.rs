//! Search module for Gomoku AI
//!
//! Contains:
//! - Threat analysis over empty cells and candidate generation
//! - Zobrist hashing for position identification
//! - Per-search evaluation cache
//! - Depth-limited alpha-beta search

pub mod alphabeta;
pub mod cache;
pub mod threat;
pub mod zobrist;

pub use alphabeta::{is_win_score, SearchResult, SearchStats, Searcher, MAX_DEPTH, WIN_SCORE};
pub use cache::EvalCache;
pub use threat::{
    candidate_cells, evaluate_cell, quick_score, scan_threats, CriticalCell, ThreatRecord,
    ThreatReport, CANDIDATE_RADIUS,
};
pub use zobrist::ZobristTable;
