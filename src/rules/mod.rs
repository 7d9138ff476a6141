//! Game rules for free-style Gomoku
//!
//! Five or more in a row wins; there are no captures or forbidden moves.

pub mod win;

// Re-exports for convenient access
pub use win::{
    check_winner, find_five_line_at_pos, find_five_positions, has_five_at_pos, has_five_in_row,
};
