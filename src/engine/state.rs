//! Turn state and counters owned by the match engine.
//!
//! ## Phases
//!
//! ```text
//! NotStarted ──start──► Previewing ──timer──► Idle ◄──────────┐
//!                                              │ flip         │ resolve
//!                                              ▼              │
//!                                          OneFlipped ──flip──► Resolving
//!                                                               │ last pair
//!                                                               ▼
//!                                 GameComplete ◄──advance── LevelComplete
//! ```
//!
//! The two flipped cards are stored as indices inside the phase, so at most
//! two live references exist and both are gone between turns.
//!
//! ## Counters
//!
//! `combo_multiplier == match_streak` at all times: a match raises both by
//! one, a mismatch resets both to zero.

use serde::{Deserialize, Serialize};

use crate::cards::CardIndex;

/// Where the engine is in the turn cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No board has been built yet.
    #[default]
    NotStarted,
    /// All cards shown at level start; flips blocked.
    Previewing,
    /// Waiting for the first flip of a turn.
    Idle,
    /// One card is face-up, waiting for the second.
    OneFlipped { first: CardIndex },
    /// Two cards are face-up; resolution is scheduled. Flips blocked.
    Resolving { first: CardIndex, second: CardIndex },
    /// Every pair matched; waiting to advance.
    LevelComplete,
    /// The last level was completed.
    GameComplete,
}

impl Phase {
    /// Does this phase accept flip requests?
    #[must_use]
    pub const fn accepts_flips(self) -> bool {
        matches!(self, Self::Idle | Self::OneFlipped { .. })
    }

    /// Is a level being played (board built and not finished)?
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(
            self,
            Self::Previewing | Self::Idle | Self::OneFlipped { .. } | Self::Resolving { .. }
        )
    }

    /// May a new level be started without an explicit override?
    #[must_use]
    pub const fn can_start_level(self) -> bool {
        matches!(self, Self::NotStarted | Self::LevelComplete | Self::GameComplete)
    }
}

/// Scores, streaks and the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEngineState {
    /// Total score. Goes negative after early mismatches.
    pub score: i64,

    /// Multiplier applied to the next match reward; equals `match_streak`.
    pub combo_multiplier: u32,

    /// Consecutive matches since the last mismatch.
    pub match_streak: u32,

    /// Pairs matched on the current level.
    pub matched_pairs: u32,

    /// Index of the level being played.
    pub current_level: usize,

    /// Turn phase.
    pub phase: Phase,
}

impl MatchEngineState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The first card flipped this turn, if any.
    #[must_use]
    pub fn first_flipped(&self) -> Option<CardIndex> {
        match self.phase {
            Phase::OneFlipped { first } | Phase::Resolving { first, .. } => Some(first),
            _ => None,
        }
    }

    /// The second card flipped this turn, if any.
    #[must_use]
    pub fn second_flipped(&self) -> Option<CardIndex> {
        match self.phase {
            Phase::Resolving { second, .. } => Some(second),
            _ => None,
        }
    }

    /// Is a pair waiting to be resolved?
    #[must_use]
    pub fn awaiting_resolution(&self) -> bool {
        matches!(self.phase, Phase::Resolving { .. })
    }

    /// Is `index` one of the cards flipped this turn?
    #[must_use]
    pub fn is_flipped_this_turn(&self, index: CardIndex) -> bool {
        self.first_flipped() == Some(index) || self.second_flipped() == Some(index)
    }

    /// Zero the streak and multiplier.
    pub fn reset_streak(&mut self) {
        self.match_streak = 0;
        self.combo_multiplier = 0;
    }

    /// Zero everything for a new game.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
