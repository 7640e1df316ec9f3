//! The match engine.
//!
//! - `state`: `Phase` and `MatchEngineState` (scores, streak, turn)
//! - `outcome`: results of flip and level requests
//! - `event`: `EngineEvent`, drained by the host after each call
//! - `timer`: `TimerQueue` of delayed tasks guarded by board generation
//! - `match_engine`: `MatchEngine`, which ties them together

pub mod event;
pub mod match_engine;
pub mod outcome;
pub mod state;
pub mod timer;

pub use event::EngineEvent;
pub use match_engine::{Counters, MatchEngine};
pub use outcome::{FlipOutcome, IgnoreReason, LevelStart, Resolution};
pub use state::{MatchEngineState, Phase};
pub use timer::{ScheduledTask, TimerKind, TimerQueue};
