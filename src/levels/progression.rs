//! Unlock gate.
//!
//! `Progression` remembers the highest level the player may select. It only
//! ever grows: completing a level unlocks the next one, and replaying or
//! re-reporting an earlier completion changes nothing.
//!
//! It is persisted separately from the in-progress snapshot, so unlocks
//! survive even when the player quits on the level-complete banner.

use serde::{Deserialize, Serialize};

/// Highest unlocked level index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    max_unlocked_level: usize,
}

impl Progression {
    /// Fresh progression: only level 0 is unlocked.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_unlocked_level: 0,
        }
    }

    /// Progression with the given level already unlocked.
    #[must_use]
    pub const fn with_unlocked(max_unlocked_level: usize) -> Self {
        Self { max_unlocked_level }
    }

    /// Highest selectable level index.
    #[must_use]
    pub const fn max_unlocked_level(&self) -> usize {
        self.max_unlocked_level
    }

    /// May the player select this level?
    #[must_use]
    pub const fn is_unlocked(&self, index: usize) -> bool {
        index <= self.max_unlocked_level
    }

    /// Record that `completed` was finished, unlocking the level after it.
    ///
    /// Returns `true` if the unlock gate moved.
    pub fn record_completion(&mut self, completed: usize) -> bool {
        let next = completed.saturating_add(1);
        if next > self.max_unlocked_level {
            self.max_unlocked_level = next;
            true
        } else {
            false
        }
    }

    /// Merge another progression (e.g. one loaded from disk), keeping the maximum.
    pub fn merge(&mut self, other: Progression) {
        self.max_unlocked_level = self.max_unlocked_level.max(other.max_unlocked_level);
    }

    /// Encode for the key/value store: a plain decimal integer.
    #[must_use]
    pub fn to_store_value(&self) -> String {
        self.max_unlocked_level.to_string()
    }

    /// Decode a stored value. Returns `None` for anything but a decimal integer.
    #[must_use]
    pub fn from_store_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(Self::with_unlocked)
    }
}
