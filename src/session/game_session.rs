use std::time::Duration;

use crate::cards::CardIndex;
use crate::core::error::Result;
use crate::engine::{EngineEvent, FlipOutcome, LevelStart, MatchEngine, ScheduledTask};
use crate::levels::Progression;
use crate::persistence::{KeyValueStore, SaveSnapshot, SnapshotError, StoreError};

/// How [`GameSession::startup`] began play.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Startup {
    /// A stored snapshot was restored.
    Resumed { level: usize },
    /// No usable snapshot; a new game was started.
    Fresh(LevelStart),
}

/// A match engine bound to a persistent store.
///
/// The session owns the lifecycle hooks around the engine: resume on
/// startup, save on exit, dropping the save when a level is selected or a
/// new game begins, and writing the unlock gate whenever it moves.
#[derive(Debug)]
pub struct GameSession<S: KeyValueStore> {
    engine: MatchEngine,
    store: S,
    persisted: Option<Progression>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Wrap an engine. Nothing is read from the store until [`startup`](Self::startup).
    #[must_use]
    pub fn new(engine: MatchEngine, store: S) -> Self {
        Self {
            engine,
            store,
            persisted: None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Split the session back into its engine and store.
    pub fn into_parts(self) -> (MatchEngine, S) {
        (self.engine, self.store)
    }

    /// Load progression, then resume the stored snapshot or start a new game.
    ///
    /// A missing, corrupt or incompatible snapshot is logged, deleted and
    /// treated as absent.
    pub fn startup(&mut self) -> Result<Startup> {
        self.load_progression();

        match self.load_snapshot() {
            Ok(Some(level)) => return Ok(Startup::Resumed { level }),
            Ok(None) => log::debug!("No saved game"),
            Err(err) => {
                log::warn!("Ignoring saved game: {}", err);
                self.store.delete(&self.engine.config().keys.snapshot);
            }
        }

        let started = self.engine.new_game()?;
        self.sync_progression();
        Ok(Startup::Fresh(started))
    }

    fn load_progression(&mut self) {
        let key = &self.engine.config().keys.progression;
        let Some(raw) = self.store.get(key) else {
            return;
        };
        match Progression::from_store_value(&raw) {
            Some(stored) => {
                self.engine.restore_progression(stored);
                self.persisted = Some(stored);
                log::info!("Loaded progression: level {} unlocked", stored.max_unlocked_level());
            }
            None => log::warn!("Ignoring unreadable progression value {:?}", raw),
        }
    }

    fn load_snapshot(&mut self) -> std::result::Result<Option<usize>, SnapshotError> {
        let Some(raw) = self.store.get(&self.engine.config().keys.snapshot) else {
            return Ok(None);
        };
        let snapshot = SaveSnapshot::decode(&raw)?;
        snapshot.restore_into(&mut self.engine)?;
        log::info!("Resumed level {}", snapshot.current_level_index);
        Ok(Some(snapshot.current_level_index))
    }

    // === Input ===

    pub fn request_flip(&mut self, index: CardIndex) -> FlipOutcome {
        self.engine.request_flip(index)
    }

    /// Start over from level 0 with a zero score. Any save is dropped.
    pub fn request_new_game(&mut self) -> Result<LevelStart> {
        let started = self.engine.new_game()?;
        self.delete_snapshot();
        Ok(started)
    }

    /// Reshuffle the current level.
    pub fn request_restart_level(&mut self) -> Result<LevelStart> {
        self.engine.restart_level()
    }

    /// Jump to an unlocked level. On success the old save is dropped.
    pub fn on_level_select(&mut self, index: usize) -> Result<LevelStart> {
        let started = self.engine.select_level(index)?;
        self.delete_snapshot();
        Ok(started)
    }

    // === Time ===

    pub fn advance_time(&mut self, elapsed: Duration) {
        self.engine.advance_time(elapsed);
        self.sync_progression();
    }

    pub fn settle(&mut self) {
        self.engine.settle();
        self.sync_progression();
    }

    pub fn fire(&mut self, task: ScheduledTask) -> bool {
        let changed = self.engine.fire(task);
        self.sync_progression();
        changed
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.engine.drain_events()
    }

    // === Saving ===

    /// Write a snapshot if a level is in progress. Returns whether one was written.
    ///
    /// A pair waiting on its resolution timer is saved unresolved and comes
    /// back face-down.
    pub fn save(&mut self) -> std::result::Result<bool, StoreError> {
        if !self.engine.is_level_in_progress() {
            return Ok(false);
        }
        let encoded = SaveSnapshot::capture_engine(&self.engine).encode()?;
        self.store.set(&self.engine.config().keys.snapshot, encoded);
        log::info!(
            "Saved level {} (score {})",
            self.engine.current_level(),
            self.engine.score()
        );
        Ok(true)
    }

    /// Save any level in progress and flush the store.
    pub fn on_application_exit(&mut self) -> std::result::Result<(), StoreError> {
        self.save()?;
        self.write_progression();
        self.store.flush()
    }

    /// Persist the unlock gate if it moved; drop the save once a level is over.
    fn sync_progression(&mut self) {
        if !self.engine.is_level_in_progress() {
            let key = &self.engine.config().keys.snapshot;
            if self.store.has(key) {
                self.store.delete(key);
            }
        }
        if self.persisted == Some(self.engine.progression()) {
            return;
        }
        self.write_progression();
        if let Err(err) = self.store.flush() {
            log::error!("Could not persist progression: {}", err);
        }
    }

    fn write_progression(&mut self) {
        let progression = self.engine.progression();
        self.store
            .set(&self.engine.config().keys.progression, progression.to_store_value());
        self.persisted = Some(progression);
    }

    fn delete_snapshot(&mut self) {
        self.store.delete(&self.engine.config().keys.snapshot);
    }
}
