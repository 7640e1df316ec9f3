//! Core engine types: RNG, configuration, errors.
//!
//! This module contains the building blocks shared by every other module.
//! Hosts configure the engine via `EngineConfig` rather than modifying it.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{EngineConfig, Scoring, StoreKeys, Timings};
pub use error::{GameError, Result};
pub use rng::GameRng;
