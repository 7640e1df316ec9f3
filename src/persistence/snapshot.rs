//! Versioned save snapshots.
//!
//! A [`SaveSnapshot`] captures an in-progress level: scalar counters, the
//! grid shape and one [`CardState`] per cell in board order. Its JSON field
//! names are a compatibility surface shared with older saves:
//!
//! ```json
//! {
//!   "saveVersion": 1,
//!   "score": 8,
//!   "comboMultiplier": 1,
//!   "matchStreak": 1,
//!   "currentLevelIndex": 0,
//!   "gridWidth": 2,
//!   "gridHeight": 2,
//!   "cardStates": [
//!     { "cardID": 0, "isMatched": true },
//!     { "cardID": 1, "isMatched": false },
//!     { "cardID": 0, "isMatched": true },
//!     { "cardID": 1, "isMatched": false }
//!   ]
//! }
//! ```
//!
//! Face-up state is not stored. Matched cards come back face-up, everything
//! else face-down. A pair still waiting to be resolved when the snapshot was
//! taken comes back as two face-down cards.
//!
//! ## Validation
//!
//! [`SaveSnapshot::decode`] checks structure only (JSON, version, card
//! count). [`SaveSnapshot::restore_into`] checks the snapshot against the
//! engine's catalog before touching anything.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cards::SymbolId;
use crate::engine::{Counters, MatchEngine, MatchEngineState};

use super::error::{SnapshotError, StoreError};

/// Snapshot schema version written by this crate.
pub const SAVE_VERSION: u32 = 1;

/// One board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    #[serde(rename = "cardID")]
    pub card_id: u32,
    #[serde(rename = "isMatched")]
    pub is_matched: bool,
}

/// Serialized in-progress level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshot {
    /// Missing in pre-versioned saves, which then fail the version check.
    #[serde(default)]
    pub save_version: u32,
    pub score: i64,
    pub combo_multiplier: u32,
    pub match_streak: u32,
    pub current_level_index: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    #[serde(default)]
    pub card_states: Vec<CardState>,
}

impl SaveSnapshot {
    /// Capture the engine counters and the board.
    #[must_use]
    pub fn capture(state: &MatchEngineState, board: &Board) -> Self {
        Self {
            save_version: SAVE_VERSION,
            score: state.score,
            combo_multiplier: state.combo_multiplier,
            match_streak: state.match_streak,
            current_level_index: state.current_level,
            grid_width: board.width(),
            grid_height: board.height(),
            card_states: board
                .cards()
                .iter()
                .map(|card| CardState {
                    card_id: card.symbol.raw(),
                    is_matched: card.matched,
                })
                .collect(),
        }
    }

    /// Capture the engine's current level.
    #[must_use]
    pub fn capture_engine(engine: &MatchEngine) -> Self {
        Self::capture(engine.state(), engine.board())
    }

    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and structurally validate a stored snapshot.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(raw).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Structural checks that need no catalog.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.save_version != SAVE_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.save_version,
                supported: SAVE_VERSION,
            });
        }
        if self.card_states.is_empty() {
            return Err(SnapshotError::EmptyCardStates);
        }
        let expected = self.grid_width.saturating_mul(self.grid_height);
        if self.card_states.len() != expected {
            return Err(SnapshotError::CardCountMismatch {
                expected,
                actual: self.card_states.len(),
            });
        }
        Ok(())
    }

    /// Check the snapshot describes a resumable board of its level.
    ///
    /// Every symbol must appear exactly twice with both cards sharing one
    /// matched flag, and at least one pair must be left to play.
    pub fn check_pairs(&self) -> Result<(), SnapshotError> {
        let mut pairs: FxHashMap<u32, (usize, bool)> = FxHashMap::default();
        for state in &self.card_states {
            let entry = pairs.entry(state.card_id).or_insert((0, state.is_matched));
            entry.0 += 1;
            if entry.0 > 2 || entry.1 != state.is_matched {
                return Err(SnapshotError::BrokenPairs {
                    symbol: state.card_id,
                });
            }
        }
        if let Some((&symbol, _)) = pairs.iter().find(|(_, entry)| entry.0 != 2) {
            return Err(SnapshotError::BrokenPairs { symbol });
        }
        if self.card_states.iter().all(|s| s.is_matched) {
            return Err(SnapshotError::NothingToResume);
        }
        Ok(())
    }

    /// Rebuild the engine's board and counters from this snapshot.
    ///
    /// Nothing is changed unless every check passes.
    pub fn restore_into(&self, engine: &mut MatchEngine) -> Result<(), SnapshotError> {
        self.validate()?;

        let index = self.current_level_index;
        let mismatch = SnapshotError::LevelMismatch {
            level: index,
            width: self.grid_width,
            height: self.grid_height,
        };
        let Some(level) = engine.catalog().get(index) else {
            return Err(mismatch);
        };
        if level.grid_width != self.grid_width || level.grid_height != self.grid_height {
            return Err(mismatch);
        }
        self.check_pairs()?;

        let cards: Vec<(SymbolId, bool)> = self
            .card_states
            .iter()
            .map(|s| (SymbolId::new(s.card_id), s.is_matched))
            .collect();
        let counters = Counters {
            score: self.score,
            combo_multiplier: self.combo_multiplier,
            match_streak: self.match_streak,
        };
        engine.install_restored(index, &cards, counters)?;
        Ok(())
    }
}
