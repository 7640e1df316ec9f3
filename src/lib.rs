//! # match-pairs
//!
//! A memory-matching (pairs) game engine with no rendering, input or audio
//! dependencies.
//!
//! ## Design Principles
//!
//! 1. **Headless**: The engine reports what changed through `EngineEvent`s.
//!    Renderers, sound and UI follow the event stream.
//!
//! 2. **Host-Driven Time**: Delays (peek, preview, banners) are scheduled
//!    tasks. The host advances engine time; nothing blocks or sleeps.
//!
//! 3. **Configuration Over Convention**: Timings, scoring, store keys and the
//!    level list come from `EngineConfig` and `LevelCatalog`, in code or TOML.
//!
//! ## Architecture
//!
//! - **Arena Board**: The board owns its cards in a flat `Vec`; the engine
//!   refers to cards by `CardIndex` only.
//!
//! - **Generation Tokens**: Every board rebuild bumps a generation counter.
//!   Scheduled tasks carry the generation they were queued under and do
//!   nothing once it is stale.
//!
//! - **Injected Storage**: Saves go through the `KeyValueStore` trait, so
//!   tests run against `MemoryStore` and games pick their own backend.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `cards`: Symbol and cell identifiers, per-card state
//! - `board`: Pair generation and the `Board`
//! - `levels`: Level catalog and the unlock gate
//! - `engine`: Turn state machine, scoring, timers, events
//! - `persistence`: Key/value stores and versioned snapshots
//! - `session`: Startup resume, exit save and other lifecycle hooks

pub mod core;
pub mod cards;
pub mod board;
pub mod levels;
pub mod engine;
pub mod persistence;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig, Scoring, StoreKeys, Timings,
    GameError, Result,
    GameRng,
};

pub use crate::cards::{Card, CardIndex, SymbolId};

pub use crate::board::{Board, generate_pair_sequence, shuffle_in_place};

pub use crate::levels::{LevelCatalog, LevelDefinition, Progression};

pub use crate::engine::{
    EngineEvent, MatchEngine, MatchEngineState, Phase,
    FlipOutcome, IgnoreReason, LevelStart, Resolution,
    ScheduledTask, TimerKind, TimerQueue,
};

pub use crate::persistence::{
    KeyValueStore, MemoryStore, FileStore,
    SaveSnapshot, CardState, SAVE_VERSION,
    SnapshotError, StoreError,
};

pub use crate::session::{GameSession, Startup};
