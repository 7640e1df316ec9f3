//! Lifecycle glue between the engine and a persistent store.
//!
//! ```
//! use match_pairs::core::EngineConfig;
//! use match_pairs::engine::MatchEngine;
//! use match_pairs::levels::LevelCatalog;
//! use match_pairs::persistence::{KeyValueStore, MemoryStore};
//! use match_pairs::session::{GameSession, Startup};
//!
//! let engine = MatchEngine::with_seed(EngineConfig::new(), LevelCatalog::standard(), 1);
//! let mut session = GameSession::new(engine, MemoryStore::new());
//!
//! assert!(matches!(session.startup().unwrap(), Startup::Fresh(_)));
//! session.on_application_exit().unwrap();
//! assert!(session.store().has("SaveData"));
//! ```

mod game_session;

pub use game_session::{GameSession, Startup};
