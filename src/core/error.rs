//! Configuration errors.
//!
//! Only content/configuration problems are errors. Rejected player input
//! (flipping during resolution, clicking a matched card) is reported through
//! outcome enums instead, and corrupt saves have their own
//! [`SnapshotError`](crate::persistence::SnapshotError).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("level {index} is out of range (catalog has {count} levels)")]
    LevelOutOfRange { index: usize, count: usize },
    #[error("level {index} is locked (highest unlocked level is {max_unlocked})")]
    LevelLocked { index: usize, max_unlocked: usize },
    #[error("not enough symbols: {pairs} pairs need {pairs} symbols, level declares {symbols}")]
    InsufficientSymbols { pairs: usize, symbols: usize },
    #[error("face assignment has {actual} entries, grid needs {expected}")]
    AssignmentLength { expected: usize, actual: usize },
    #[error("symbol {symbol} is outside the level's {symbols} symbols")]
    SymbolOutOfRange { symbol: u32, symbols: usize },
    #[error("grid {width}x{height} must have a non-zero, even number of cells")]
    InvalidGrid { width: usize, height: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
