//! Engine events.
//!
//! Events describe what changed so a renderer, sound layer or UI can follow
//! along without the engine knowing any of them exist. The engine queues
//! events as transitions happen; the host takes them with
//! [`MatchEngine::drain_events`](super::MatchEngine::drain_events).

use serde::{Deserialize, Serialize};

use crate::cards::CardIndex;

/// Something observable happened in the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A board was built (fresh or restored).
    LevelStarted {
        level: usize,
        width: usize,
        height: usize,
    },

    /// A card turned face-up or face-down.
    CardFaceChanged { index: CardIndex, face_up: bool },

    /// A card was paired and is no longer interactive.
    CardMatched { index: CardIndex },

    /// New total score.
    ScoreChanged(i64),

    /// New combo multiplier.
    ComboChanged(u32),

    /// Show the combo banner with this multiplier.
    ComboBannerShown(u32),

    /// The combo banner interval elapsed.
    ComboBannerHidden,

    /// Level-start preview began; flips are blocked.
    PreviewStarted,

    /// Preview finished; flips are accepted.
    PreviewEnded,

    /// Every pair of this level has been matched.
    LevelCompleted(usize),

    /// The last level was completed and there is nothing left to start.
    GameCompleted,
}
