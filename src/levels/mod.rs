//! Level catalog and progression.
//!
//! - `catalog`: `LevelDefinition` and the ordered `LevelCatalog`
//! - `progression`: the monotonic "max unlocked level" gate

pub mod catalog;
pub mod progression;

pub use catalog::{LevelCatalog, LevelDefinition};
pub use progression::Progression;
