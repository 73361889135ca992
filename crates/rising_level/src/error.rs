//! Level loading errors

use thiserror::Error;

/// Errors raised while building a level
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("Level layout has no cells")]
    Empty,

    #[error("Row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },

    #[error("Unknown cell '{symbol}' at row {row}, column {column}")]
    UnknownCell { row: usize, column: usize, symbol: String },

    #[error("Cell size must be positive, got {0}")]
    InvalidCellSize(f32),
}

pub type Result<T> = std::result::Result<T, LevelError>;
