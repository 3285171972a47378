//! Error type shared by the board engine and the search engines.

use thiserror::Error;

use crate::types::Square;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChessError {
    /// A move has no action index. Only happens for moves built outside the generator.
    #[error("move {mv} has no action index: {reason}")]
    Encoding { mv: String, reason: &'static str },

    #[error("no search statistics for position {0:#018x}")]
    UnvisitedPosition(u64),

    #[error("no piece on {0}")]
    MissingPiece(Square),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("no move to undo")]
    NoHistory,

    #[error("evaluator failed: {0}")]
    Evaluator(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
