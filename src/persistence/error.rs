//! Persistence errors.
//!
//! `SnapshotError` means "this save cannot be resumed". Callers log it and
//! carry on as if no save existed. `StoreError` is a backend failure.

use thiserror::Error;

use crate::core::error::GameError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Malformed(String),
    #[error("snapshot version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("snapshot has no card states")]
    EmptyCardStates,
    #[error("snapshot has {actual} card states for a grid of {expected} cells")]
    CardCountMismatch { expected: usize, actual: usize },
    #[error("snapshot grid {width}x{height} does not match level {level}")]
    LevelMismatch {
        level: usize,
        width: usize,
        height: usize,
    },
    #[error("symbol {symbol} does not form a consistent pair")]
    BrokenPairs { symbol: u32 },
    #[error("every pair in the snapshot is already matched")]
    NothingToResume,
    #[error("snapshot rejected by the board: {0}")]
    Incompatible(#[from] GameError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode store data: {0}")]
    Encode(#[from] serde_json::Error),
}
