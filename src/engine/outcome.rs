use serde::{Deserialize, Serialize};

/// Why a flip request did nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The engine is previewing, resolving, or between levels.
    NotAccepting,
    /// No card at that index.
    OutOfRange,
    /// The card is already matched.
    Matched,
    /// The card is already face-up this turn.
    AlreadyFlipped,
}

/// Result of a flip request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    Ignored(IgnoreReason),
    /// First card of the turn is face-up.
    FirstFlipped,
    /// Second card is face-up; resolution is scheduled.
    PairPending,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Result of a request to start or advance a level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStart {
    /// A board was built for this level.
    Started(usize),
    /// There is no level after the last one.
    GameComplete,
    /// The engine is mid-level; nothing changed.
    Ignored,
}

/// Result of resolving a pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Match { gained: i64, combo: u32 },
    Mismatch { lost: i64 },
}
