//! Error taxonomy for the engine and its training log

use thiserror::Error;

/// Errors surfaced by the board model, the decision procedure and the
/// self-play training store.
///
/// A full board is not an error: `decide_move` returns `None` for it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A move addressed a cell outside the board or an occupied cell.
    #[error("illegal move at ({row}, {col}): {reason}")]
    IllegalMove {
        row: i32,
        col: i32,
        reason: &'static str,
    },

    /// A textual board or move could not be parsed.
    #[error("invalid board: {message}")]
    InvalidBoard { message: String },

    /// Persisted game log failed to parse or validate.
    #[error("corrupted training data: {message}")]
    CorruptedTrainingData { message: String },

    /// A self-play game was abandoned through the trainer's cancel flag.
    #[error("self-play game cancelled")]
    Cancelled,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn out_of_range(row: i32, col: i32) -> Self {
        EngineError::IllegalMove {
            row,
            col,
            reason: "outside the board",
        }
    }

    pub(crate) fn occupied(row: i32, col: i32) -> Self {
        EngineError::IllegalMove {
            row,
            col,
            reason: "cell is occupied",
        }
    }

    pub(crate) fn corrupted(message: impl Into<String>) -> Self {
        EngineError::CorruptedTrainingData {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_board(message: impl Into<String>) -> Self {
        EngineError::InvalidBoard {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::IllegalMove { .. } => "illegal_move",
            EngineError::InvalidBoard { .. } => "invalid_board",
            EngineError::CorruptedTrainingData { .. } => "corrupted_training_data",
            EngineError::Cancelled => "cancelled",
            EngineError::Io(_) => "io",
        }
    }
}
